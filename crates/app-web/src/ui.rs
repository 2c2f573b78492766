use app_core::FormationMode;
use web_sys as web;

/// Reflect the current mode in the on-page hint element, if present.
pub fn set_mode_hint(document: &web::Document, mode: FormationMode) {
    if let Ok(Some(el)) = document.query_selector(".hint") {
        let text = match mode {
            FormationMode::Scattered => "click to grow the tree",
            FormationMode::Formed => "click to scatter",
        };
        el.set_text_content(Some(text));
    }
}
