//! Server entry-point – Axum + Leptos SSR.

#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use std::net::SocketAddr;
    use std::path::PathBuf;

    use axum::Router;
    use leptos::prelude::*;
    use leptos_axum::{generate_route_list, LeptosRoutes};
    use tower_http::trace::TraceLayer;

    use taskmap_common::config::{self, Config};
    use taskmap_web::app::{shell, App, AppState};
    use taskmap_web::server::api::ApiClient;

    // ── Tracing ──────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskmap_web=info,taskmap_common=info,tower_http=info".into()),
        )
        .init();

    // ── Configuration ────────────────────────────────────────────────────
    let config_path = PathBuf::from(
        std::env::var("TASKMAP_CONFIG").unwrap_or_else(|_| Config::default_path().into()),
    );
    let config = config::load_or_default(&config_path)?;
    tracing::info!("Project API at {}", config.api_base_url);

    let conf = get_configuration(None)?;
    let leptos_options = conf.leptos_options;
    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .unwrap_or(leptos_options.site_addr);

    let state = AppState {
        api: ApiClient::new(&config)?,
        config,
        leptos_options: leptos_options.clone(),
    };

    // ── Routes ───────────────────────────────────────────────────────────
    let routes = generate_route_list(App);

    let app = Router::new()
        .leptos_routes_with_context(
            &leptos_options,
            routes,
            {
                let state = state.clone();
                move || {
                    provide_context(state.config.clone());
                    provide_context(state.clone());
                }
            },
            {
                let leptos_options = leptos_options.clone();
                move || shell(leptos_options.clone())
            },
        )
        // Static assets (WASM bundle, CSS) from the site root
        .fallback(leptos_axum::file_and_error_handler(shell))
        .layer(TraceLayer::new_for_http())
        .with_state(leptos_options);

    tracing::info!("Taskmap Web listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

#[cfg(not(feature = "ssr"))]
fn main() {
    // This binary is only built with the `ssr` feature.
    // The WASM entry point is `lib::hydrate()`.
}
