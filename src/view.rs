//! Template rendering.
//!
//! Templates are compiled into the binary and loaded into a single minijinja
//! environment at startup. Every render receives the request's locals
//! (secret-stripped config snapshot and CSRF token) merged with the page's
//! own context.

use axum::response::Html;
use minijinja::{context, value::Value, Environment};

use crate::{error::Error, middleware::locals::Locals, model::app::AppState};

/// Build the template environment.
pub fn templates() -> Result<Environment<'static>, minijinja::Error> {
    let mut env = Environment::new();
    env.add_template("base.html", include_str!("../templates/base.html"))?;
    env.add_template("index.html", include_str!("../templates/index.html"))?;

    Ok(env)
}

/// Render `name` with the request locals merged into `page`.
pub fn render(
    state: &AppState,
    name: &str,
    locals: &Locals,
    page: Value,
) -> Result<Html<String>, Error> {
    let template = state.templates.get_template(name)?;

    let rendered = template.render(context! {
        config => locals.config.as_ref(),
        csrf_token => locals.csrf_token,
        ..page
    })?;

    Ok(Html(rendered))
}
