//! Start the blog server

use std::sync::Arc;

use clap::Args;
use color_eyre::eyre::{eyre, Result};
use console::style;
use quill_core::{
    CommentService, DatabaseHandle, IdGenerator, NoopNotifier, NotificationSettings, Notifier,
};
use quill_db::Database;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::config::QuillConfig;
use crate::server::{create_router, run_server, AppState};
use crate::slack::SlackNotifier;

/// Start the blog server
///
/// The listener comes up immediately; comment endpoints answer with a
/// "not ready" error until the database connection has been established.
#[derive(Args)]
pub struct ServeCommand {
    /// Host to bind to
    #[arg(long, env = "QUILL_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long, short, env = "QUILL_PORT")]
    pub port: Option<u16>,

    /// Database URL, overriding the config file
    #[arg(long, env = "QUILL_DATABASE_URL")]
    pub database_url: Option<String>,
}

impl ServeCommand {
    pub async fn run(self, config: QuillConfig) -> Result<()> {
        let server = config.server;
        let host = self.host.unwrap_or(server.host.clone());
        let port = self.port.unwrap_or(server.port);

        let mut settings = config.database.settings();
        if let Some(url) = self.database_url {
            settings.url = url;
        }
        let policy = config.database.retry_policy();

        let notifier: Arc<dyn Notifier> = match config.slack.bot_token {
            Some(token) => Arc::new(SlackNotifier::new(token)?),
            None => {
                info!("no Slack bot token configured, notifications are disabled");
                Arc::new(NoopNotifier)
            }
        };

        let ids = Arc::new(IdGenerator::new(server.machine_id)?);
        info!(machine_id = ids.machine_id(), "id generator ready");

        let handle: Arc<DatabaseHandle<Database>> = Arc::new(DatabaseHandle::new());
        let service = CommentService::new(
            Arc::clone(&handle),
            ids,
            notifier,
            NotificationSettings {
                channel_id: config.slack.channel_id,
                site_url: server.site_url.clone(),
            },
        );
        let state = AppState::new(service, server.secure_cookie);
        let app = create_router(state, &server.site_dir, server.request_timeout());

        let listener = TcpListener::bind((host.as_str(), port))
            .await
            .map_err(|e| eyre!("Could not bind {}:{}: {}", host, port, e))?;

        println!("{} Starting Quill server...", style("→").blue());
        println!();
        println!(
            "  {} Site: {}",
            style("◆").cyan(),
            style(format!("http://{}:{}", host, port))
                .underlined()
                .cyan()
        );
        println!(
            "  {} API:  {}",
            style("◆").cyan(),
            style(format!("http://{}:{}/api/public/v0", host, port))
                .underlined()
                .cyan()
        );
        println!();
        println!("  Press {} to stop the server", style("Ctrl+C").yellow());
        println!();

        let (stop_tx, mut stop_rx) = watch::channel(());
        let server_task = tokio::spawn(run_server(listener, app, async move {
            let _ = stop_rx.changed().await;
        }));

        let signal = shutdown_signal();
        tokio::pin!(signal);

        let connected = tokio::select! {
            result = Database::connect_with_retry(&settings, &policy) => Some(result),
            _ = &mut signal => None,
        };

        let db = match connected {
            Some(Ok(db)) => {
                let db = Arc::new(db);
                if let Err(err) = db.init_schema().await {
                    error!(error = %err, "failed to initialize database schema");
                }
                handle.set(Arc::clone(&db))?;
                info!("database is ready");

                signal.await;
                Some(db)
            }
            Some(Err(err)) => {
                let _ = stop_tx.send(());
                server_task.await??;
                return Err(eyre!("Could not connect to the database: {}", err));
            }
            None => {
                warn!("shutdown requested before the database became ready");
                None
            }
        };

        info!("shutting down");
        let _ = stop_tx.send(());
        server_task.await??;

        if let Some(db) = db {
            db.close().await;
        }

        Ok(())
    }
}

/// Resolve on Ctrl-C, or SIGTERM on unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
