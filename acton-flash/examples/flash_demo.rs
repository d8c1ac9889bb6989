//! Flash message demo server
//!
//! Run with `cargo run -p acton-flash --example flash_demo`, then:
//!
//! ```text
//! curl -i -X POST -d "message=hello" http://127.0.0.1:3000/notify
//! curl -b "acton_session=<id from Set-Cookie>" http://127.0.0.1:3000/
//! ```

use acton_flash::{
    extractors::Flashes, flash, Flash, FlashDictionary, MemoryStore, SessionConfig, SessionLayer,
};
use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Deserialize)]
struct Notify {
    message: String,
}

struct FlashItem<'a> {
    key: &'a str,
    message: &'a str,
}

// Auto-escaped because of the `html` extension.
#[derive(Template)]
#[template(
    source = r#"<h1>Flash demo</h1><ul>{% for item in items %}<li class="{{ item.key }}">{{ item.message }}</li>{% endfor %}</ul>"#,
    ext = "html"
)]
struct IndexTemplate<'a> {
    items: Vec<FlashItem<'a>>,
}

fn render_index(flashes: &FlashDictionary) -> Result<String, askama::Error> {
    let items = flashes
        .iter()
        .flat_map(|(key, messages)| {
            messages.iter().map(move |message| FlashItem {
                key: key.as_str(),
                message: message.as_str(),
            })
        })
        .collect();

    IndexTemplate { items }.render()
}

async fn notify(flash: Flash, Form(form): Form<Notify>) -> Redirect {
    flash.push("info", form.message);
    Redirect::to("/")
}

async fn index(Flashes(flashes): Flashes) -> Response {
    match render_index(&flashes) {
        Ok(html) => Html(html).into_response(),
        Err(err) => {
            tracing::error!("Template rendering error: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Template rendering failed",
            )
                .into_response()
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("acton_flash=debug,info")),
        )
        .init();

    let config = SessionConfig::load().unwrap_or_else(|err| {
        tracing::warn!(error = %err, "Falling back to default session configuration");
        SessionConfig::default()
    });

    let app = Router::new()
        .route("/", get(index))
        .route("/notify", post(notify))
        .layer(flash())
        .layer(SessionLayer::with_config(MemoryStore::new(), config));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
    tracing::info!(addr = %listener.local_addr()?, "Flash demo listening");
    axum::serve(listener, app).await?;

    Ok(())
}
