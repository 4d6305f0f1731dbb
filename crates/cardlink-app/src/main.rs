//! Cardlink host binary - composition root.
//!
//! 1. Load configuration from TOML
//! 2. Read the widget configuration and entity states from JSON
//! 3. Wire the dispatcher to a console window, a prompt and an in-memory backend
//! 4. Feed the requested gestures through the debouncer and dispatch them
//! 5. Report the outcome and every service call the backend received

mod cli;
mod host;

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use cardlink_action::{
    ActionDispatcher, ActionKind, Debouncer, DispatchOutcome, Gesture, MemoryRemote, Prompt,
    RemoteControl, SignalBus, WidgetActions,
};
use cardlink_core::{resolve_locale, CardlinkConfig, EntityId, EntityState, LocaleFormatter};
use clap::Parser;
use tokio::sync::{broadcast, mpsc};

use crate::cli::CliArgs;
use crate::host::{describe_signal, ChronoFormatter, ConsoleWindow, FixedPrompt, StdinPrompt};

fn read_json<T>(path: &Path) -> Result<T, Box<dyn std::error::Error>>
where
    T: serde::de::DeserializeOwned,
{
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    let value = serde_json::from_str(&content)
        .map_err(|e| format!("Invalid JSON in {}: {}", path.display(), e))?;
    Ok(value)
}

fn describe(outcome: &DispatchOutcome) -> String {
    match outcome {
        DispatchOutcome::Executed(kind) => format!("{} executed", kind),
        DispatchOutcome::Skipped { kind, reason } => format!("{} skipped ({})", kind, reason),
        DispatchOutcome::Cancelled(kind) => format!("{} cancelled", kind),
    }
}

/// The widget's entity, when it is a well-formed `domain.object_id`.
fn widget_entity(widget: &WidgetActions) -> Option<EntityId> {
    let raw = widget.entity.as_deref()?;
    match EntityId::parse(raw) {
        Ok(id) => Some(id),
        Err(e) => {
            tracing::warn!(error = %e, "Widget entity is malformed");
            None
        }
    }
}

/// Whether `outcome` spawned a backend service call.
fn calls_backend(outcome: &DispatchOutcome) -> bool {
    outcome.is_executed() && matches!(outcome.kind(), ActionKind::Toggle | ActionKind::CallService)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // The global subscriber needs the configured log level, so the config
    // is loaded under a temporary warn-level subscriber.
    let config_file = args.resolve_config_path();
    let bootstrap = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("warn"))
        .finish();
    let config = tracing::subscriber::with_default(bootstrap, || {
        CardlinkConfig::load_or_default(&config_file)
    });

    // Tracing.
    let log_level = args.resolve_log_level(&config.general.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .init();

    tracing::info!(path = %config_file.display(), "Configuration ready");

    if args.save_config {
        config.save(&config_file)?;
        tracing::info!(path = %config_file.display(), "Configuration written");
    }

    // Widget and backend.
    let widget: WidgetActions = read_json(&args.card)?;
    let states: HashMap<String, EntityState> = match &args.states {
        Some(path) => read_json(path)?,
        None => HashMap::new(),
    };
    let options = widget.handler_options();
    let entity = widget_entity(&widget);
    tracing::info!(
        domain = entity.as_ref().map(|e| e.domain()).unwrap_or("-"),
        object_id = entity.as_ref().and_then(|e| e.object_id()).unwrap_or("-"),
        has_hold = options.has_hold,
        has_double_click = options.has_double_click,
        "Widget loaded"
    );

    let mut backend = MemoryRemote::new().with_states(states);
    if let Some(user) = &args.user {
        backend = backend.with_user(user.clone());
    }
    let backend = Arc::new(backend);
    let remote: Arc<dyn RemoteControl> = backend.clone();
    let locale = resolve_locale(remote.locale().as_ref(), &remote.language());

    let prompt: Arc<dyn Prompt> = match args.resolve_answer() {
        Some(answer) => Arc::new(FixedPrompt(answer)),
        None => Arc::new(StdinPrompt),
    };
    let dispatcher =
        ActionDispatcher::new(Arc::new(ConsoleWindow), prompt, config.confirmation.clone());

    // Signals raised on the widget node.
    let node = SignalBus::default();
    let mut signals = node.subscribe();
    tokio::spawn(async move {
        loop {
            match signals.recv().await {
                Ok(signal) => println!("widget signal {}", describe_signal(&signal)),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Signal listener lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    // Gestures arrive in a burst and are collapsed by the debouncer.
    let (tx, mut rx) = mpsc::unbounded_channel::<Gesture>();
    let debouncer = Debouncer::from_config(
        move |gesture: Gesture| {
            let _ = tx.send(gesture);
        },
        &config.debounce,
    );
    for _ in 0..args.repeat {
        debouncer.call(args.gesture);
    }

    let quiet = config.debounce.wait() + Duration::from_millis(100);
    let mut expected_calls = 0;
    while let Ok(Some(gesture)) = tokio::time::timeout(quiet, rx.recv()).await {
        let outcome = dispatcher.handle(&node, &remote, &widget, gesture).await;
        if calls_backend(&outcome) {
            expected_calls += 1;
        }
        println!(
            "[{}] {} -> {}",
            ChronoFormatter.format_date_time(&chrono::Utc::now(), &locale),
            gesture,
            describe(&outcome)
        );
    }

    let arrived =
        tokio::time::timeout(Duration::from_secs(2), backend.wait_for_calls(expected_calls)).await;
    match arrived {
        Ok(calls) => {
            for call in calls {
                println!("service call {}", serde_json::to_string(&call)?);
            }
        }
        Err(_) => tracing::warn!(expected = expected_calls, "Backend calls did not arrive in time"),
    }

    // Let the signal listener drain before exit.
    tokio::task::yield_now().await;
    Ok(())
}
