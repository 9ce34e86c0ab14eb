mod config;
mod feed;
mod logging;
mod poller;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use crossterm::event::KeyEvent;
use tokio::sync::mpsc;

use kubevis_tui::{
    Action, AppState, DashboardScreen, Event, EventHandler, KeyBindings, KeyContext, Tui,
};
use kubevis_types::{Density, Node, PollInterval};
use kubevis_view::Generation;

use crate::config::Settings;
use crate::feed::Feed;
use crate::poller::Poller;

pub(crate) const APP_NAME: &str = "kubevis";

/// kubevis - Kubernetes node and pod visualizer
#[derive(Parser, Debug)]
#[command(name = "kubevis")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file (default: <config dir>/kubevis/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    dashboard: DashboardArgs,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Terminal dashboard (default)
    Dashboard(DashboardArgs),
    /// Serve GET /api/kubernetes
    Serve(ServeArgs),
}

#[derive(ClapArgs, Debug, Default)]
struct DashboardArgs {
    /// Read from a running `kubevis serve` instead of the cluster
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,

    /// Auto refresh interval in seconds (0, 5, 10, 30 or 60)
    #[arg(long, value_name = "SECS", value_parser = parse_interval)]
    interval: Option<PollInterval>,

    /// Start in the detailed view
    #[arg(long)]
    detailed: bool,

    /// Kubeconfig context
    #[arg(long, value_name = "NAME")]
    context: Option<String>,

    /// Log file (default: <data dir>/kubevis/logs/kubevis.log)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

#[derive(ClapArgs, Debug)]
struct ServeArgs {
    /// Listen address
    #[arg(long, value_name = "ADDR")]
    bind: Option<SocketAddr>,

    /// Kubeconfig context
    #[arg(long, value_name = "NAME")]
    context: Option<String>,
}

fn parse_interval(s: &str) -> Result<PollInterval, String> {
    let secs: u64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a number of seconds", s))?;
    PollInterval::try_from(secs)
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = run(args).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let settings = Settings::load(args.config.as_deref())?;

    match args.command {
        Some(Command::Serve(serve)) => run_server(settings, serve).await,
        Some(Command::Dashboard(dashboard)) => run_dashboard(settings, dashboard).await,
        None => run_dashboard(settings, args.dashboard).await,
    }
}

async fn run_server(settings: Settings, args: ServeArgs) -> Result<()> {
    logging::init_stderr();

    let context = args.context.or(settings.context);
    let reader = feed::connect_cluster(context.as_deref()).await?;
    let bind = args.bind.unwrap_or(settings.server.bind);

    kubevis_api::serve(bind, reader)
        .await
        .with_context(|| format!("failed to serve on {}", bind))
}

/// Internal actions for async operations
enum InternalAction {
    /// Issue a fetch now
    Refresh,
    /// A fetch finished; the error is already formatted for display
    FetchFinished(Generation, Result<Vec<Node>, String>),
}

async fn run_dashboard(settings: Settings, args: DashboardArgs) -> Result<()> {
    // Held until the end so buffered log lines are flushed
    let _log_guard = logging::init_file(args.log_file.as_deref())?;

    let endpoint = args.endpoint.or(settings.dashboard.endpoint);
    let context = args.context.or(settings.context);
    let interval = args.interval.unwrap_or(settings.dashboard.poll_interval);
    let density = if args.detailed {
        Density::Detailed
    } else {
        settings.dashboard.density
    };

    let feed = Feed::connect(endpoint.as_deref(), context.as_deref()).await?;
    tracing::info!(source = %feed.describe(), interval = interval.label(), "starting dashboard");

    let mut state = AppState::new(feed.describe(), density, interval);

    let result = event_loop(&mut state, &feed).await;
    if let Err(e) = &result {
        tracing::error!("dashboard stopped: {:#}", e);
    }
    result
}

async fn event_loop(state: &mut AppState, feed: &Feed) -> Result<()> {
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let (internal_tx, mut internal_rx) = mpsc::unbounded_channel::<InternalAction>();

    let mut tui = Tui::new().context("failed to initialize terminal")?;
    let mut events = EventHandler::new(Duration::from_millis(250));
    let keybindings = KeyBindings::new();

    let mut poller = Poller::new();
    poller.start(state.view.poll_interval(), internal_tx.clone());

    // Initial load
    spawn_fetch(state, feed, &internal_tx);
    render(&mut tui, state)?;

    loop {
        tokio::select! {
            // Handle terminal events
            Some(event) = events.next() => {
                match event {
                    Event::Key(key) => {
                        if let Some(action) = key_action(&keybindings, state, &key) {
                            let _ = action_tx.send(action);
                        }
                    }
                    // Ticks and resizes only need a redraw
                    Event::Tick | Event::Resize(_, _) => {}
                    Event::Error(e) => {
                        let _ = action_tx.send(Action::ShowError(e));
                    }
                }
            }

            // Handle user actions
            Some(action) = action_rx.recv() => {
                handle_action(state, feed, &mut poller, &internal_tx, action);
            }

            // Handle internal async actions
            Some(internal) = internal_rx.recv() => {
                match internal {
                    InternalAction::Refresh => spawn_fetch(state, feed, &internal_tx),
                    InternalAction::FetchFinished(generation, result) => {
                        state.finish_fetch(generation, result);
                    }
                }
            }
        }

        if state.should_quit {
            break;
        }

        render(&mut tui, state)?;
    }

    poller.stop();
    events.shutdown();
    tui.restore().context("failed to restore terminal")?;

    Ok(())
}

/// Route a key press according to what currently has focus
fn key_action(keybindings: &KeyBindings, state: &AppState, key: &KeyEvent) -> Option<Action> {
    let ui = &state.ui_state;

    if ui.search_active && !ui.help_visible {
        return keybindings.get_search_input_action(key);
    }

    let context = if ui.help_visible {
        KeyContext::Global
    } else if ui.pod_detail_visible {
        KeyContext::PodDetail
    } else if ui.label_filter_active {
        KeyContext::LabelFilter
    } else {
        KeyContext::Dashboard
    };

    keybindings.get_action(context, key)
}

fn handle_action(
    state: &mut AppState,
    feed: &Feed,
    poller: &mut Poller,
    internal_tx: &mpsc::UnboundedSender<InternalAction>,
    action: Action,
) {
    match action {
        Action::GoBack => {
            state.go_back();
        }
        Action::Quit => state.should_quit = true,

        Action::ToggleHelp => state.ui_state.help_visible = !state.ui_state.help_visible,
        Action::ToggleDensity => state.toggle_density(),
        Action::ToggleLabelFilter => state.toggle_label_filter(),
        Action::ShowPodDetail => state.toggle_pod_detail(),

        Action::PodUp => state.pod_up(),
        Action::PodDown => state.pod_down(),
        Action::PodFirst => state.pod_first(),
        Action::PodLast => state.pod_last(),

        Action::OpenSearch => state.start_search(),
        Action::CloseSearch => state.close_search(),
        Action::CancelSearch => state.cancel_search(),
        Action::SearchInput(c) => state.search_input_char(c),
        Action::SearchBackspace => state.search_input_backspace(),
        Action::SearchClear => state.search_clear(),

        Action::LabelUp => state.label_up(),
        Action::LabelDown => state.label_down(),
        Action::LabelSwitchColumn => state.label_switch_column(),
        Action::LabelToggleValue => state.label_toggle_value(),
        Action::LabelClearKey => state.label_clear_key(),

        Action::ClearFilters => state.clear_filters(),

        Action::Refresh => spawn_fetch(state, feed, internal_tx),
        Action::CycleInterval => change_interval(state, poller, internal_tx, true),
        Action::CycleIntervalBack => change_interval(state, poller, internal_tx, false),

        Action::ShowError(msg) => state.show_error(msg),
    }
}

/// Step the poll interval and restart the timer. Fetches in flight are left alone.
fn change_interval(
    state: &mut AppState,
    poller: &mut Poller,
    internal_tx: &mpsc::UnboundedSender<InternalAction>,
    forward: bool,
) {
    let interval = state.cycle_interval(forward);
    poller.start(interval, internal_tx.clone());
    tracing::info!(
        interval = interval.label(),
        auto_refresh = poller.is_running(),
        "poll interval changed"
    );
}

/// Stamp a fetch and run it on its own task; the result comes back as
/// [`InternalAction::FetchFinished`]
fn spawn_fetch(
    state: &mut AppState,
    feed: &Feed,
    internal_tx: &mpsc::UnboundedSender<InternalAction>,
) {
    let generation = state.begin_fetch();
    let feed = feed.clone();
    let tx = internal_tx.clone();

    tokio::spawn(async move {
        let result = feed.fetch().await.map_err(|e| format!("{:#}", e));
        let _ = tx.send(InternalAction::FetchFinished(generation, result));
    });
}

fn render(tui: &mut Tui, state: &mut AppState) -> Result<()> {
    tui.terminal()
        .draw(|frame| DashboardScreen::render(frame, state))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_dashboard_is_default() {
        let args =
            Args::try_parse_from(["kubevis", "--interval", "10", "--detailed"]).unwrap();
        assert!(args.command.is_none());
        assert_eq!(args.dashboard.interval, Some(PollInterval::Every10s));
        assert!(args.dashboard.detailed);
    }

    #[test]
    fn test_dashboard_subcommand() {
        let args = Args::try_parse_from([
            "kubevis",
            "--config",
            "/tmp/kv.toml",
            "dashboard",
            "--endpoint",
            "http://127.0.0.1:3000",
        ])
        .unwrap();
        assert_eq!(args.config, Some(PathBuf::from("/tmp/kv.toml")));
        match args.command {
            Some(Command::Dashboard(dashboard)) => {
                assert_eq!(dashboard.endpoint.as_deref(), Some("http://127.0.0.1:3000"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_serve_subcommand() {
        let args = Args::try_parse_from([
            "kubevis", "serve", "--bind", "0.0.0.0:8080", "--context", "kind-dev",
        ])
        .unwrap();
        match args.command {
            Some(Command::Serve(serve)) => {
                assert_eq!(serve.bind.map(|b| b.port()), Some(8080));
                assert_eq!(serve.context.as_deref(), Some("kind-dev"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_config_before_serve() {
        let args =
            Args::try_parse_from(["kubevis", "--config", "/tmp/kv.toml", "serve"]).unwrap();
        assert_eq!(args.config, Some(PathBuf::from("/tmp/kv.toml")));
        assert!(matches!(args.command, Some(Command::Serve(_))));
    }

    #[test]
    fn test_rejects_unsupported_interval() {
        assert!(Args::try_parse_from(["kubevis", "--interval", "15"]).is_err());
        assert!(Args::try_parse_from(["kubevis", "--interval", "soon"]).is_err());
    }

    #[test]
    fn test_key_routing_follows_focus() {
        use crossterm::event::{KeyCode, KeyModifiers};

        let keybindings = KeyBindings::new();
        let mut state = AppState::new("test".into(), Density::Compact, PollInterval::Off);
        let q = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);

        assert_eq!(key_action(&keybindings, &state, &q), Some(Action::Quit));

        state.start_search();
        assert_eq!(
            key_action(&keybindings, &state, &q),
            Some(Action::SearchInput('q'))
        );
    }
}
