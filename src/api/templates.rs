use axum_template::engine::Engine;
use tera::Tera;

use super::AppEngine;

pub const LIST: &str = "list.html";
pub const DETAIL: &str = "detail.html";
pub const EDIT: &str = "edit.html";

const TEMPLATES: [(&str, &str); 4] = [
    ("base.html", include_str!("../../templates/base.html")),
    (LIST, include_str!("../../templates/list.html")),
    (DETAIL, include_str!("../../templates/detail.html")),
    (EDIT, include_str!("../../templates/edit.html")),
];

/// Page templates, compiled into the binary.
pub fn engine() -> Result<AppEngine, tera::Error> {
    let mut tera = Tera::default();
    tera.add_raw_templates(TEMPLATES)?;

    Ok(Engine::new(tera))
}
