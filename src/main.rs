use call_lifecycle::application::CallLifecycleCoordinator;
use call_lifecycle::config::Config;
use call_lifecycle::domain::call::{CallInputs, CallState, CallType};
use call_lifecycle::domain::lifecycle::AppState;
use call_lifecycle::domain::ports::CallUiBridge;
use call_lifecycle::domain::shared::value_objects::Platform;
use call_lifecycle::infrastructure::platform::{PlatformServices, SimulatedDevice};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Call UI stand-in that only logs the callbacks it receives
struct LoggingCallUi;

impl CallUiBridge for LoggingCallUi {
    fn on_return_from_background(&self) {
        info!("[call ui] back in the foreground");
    }

    fn on_toggle_mute(&self) {
        info!("[call ui] mute toggled from notification");
    }

    fn on_toggle_speaker(&self) {
        info!("[call ui] speaker toggled from notification");
    }

    fn on_end_call(&self) {
        info!("[call ui] hang up requested");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Optional config file as the first argument
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let mut config = Config::load(config_path.as_deref())?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // The simulated device behaves like an Android handset
    if config.platform != Platform::Android {
        info!("Simulating Android instead of {}", config.platform);
        config.platform = Platform::Android;
    }
    info!("Configuration loaded: {:?}", config);

    let device = Arc::new(SimulatedDevice::new());
    let coordinator = CallLifecycleCoordinator::new(
        &config,
        PlatformServices::simulated(device.clone()),
        Arc::new(LoggingCallUi),
    );

    demo_call_lifecycle(&coordinator, &config).await;

    info!(
        "Device after call: service running={}, wake held={}, {} platform calls",
        device.is_service_running(),
        device.is_wake_held(),
        device.calls().len()
    );

    coordinator.dispose().await;
    Ok(())
}

/// Walk one voice call through ringing, backgrounding, toggles and hang-up
async fn demo_call_lifecycle(coordinator: &CallLifecycleCoordinator, config: &Config) {
    info!("=== Call Lifecycle Demo ===");

    let inputs = CallInputs::new(CallState::Ringing)
        .with_call_id("demo-call-1")
        .with_call_type(CallType::Voice)
        .with_caller_name("Ms. Smith");
    coordinator.apply_inputs(inputs.clone()).await;

    coordinator
        .apply_inputs(CallInputs {
            call_state: CallState::Connected,
            ..inputs
        })
        .await;

    coordinator.on_app_lifecycle_changed(AppState::Background).await;

    // Taps on the notification while backgrounded
    coordinator.handle_notification_action("toggle_mute").await;
    coordinator.handle_notification_action("toggle_speaker").await;
    tokio::time::sleep(config.notification.debounce_window() + Duration::from_millis(50)).await;

    coordinator.on_app_lifecycle_changed(AppState::Active).await;
    coordinator.handle_notification_action("end_call").await;
    coordinator.on_call_state_changed(CallState::Ended).await;

    for event in coordinator.take_events().await {
        info!("Event: {} {:?}", event.metadata.event_type, event.kind);
    }

    info!("=== Call Lifecycle Demo Complete ===");
}
