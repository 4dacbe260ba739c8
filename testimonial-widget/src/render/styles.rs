//! Theme-driven stylesheet

use crate::theme::Theme;

/// Fixed card width; the track scrolls horizontally past it.
pub const CARD_WIDTH_PX: u32 = 280;

/// Stylesheet for one widget.
///
/// `isolated` adds the `:host` reset used inside an isolated subtree.
pub fn stylesheet(theme: &Theme, animation: bool, isolated: bool) -> String {
    let mut css = String::new();

    if isolated {
        css.push_str(":host{all:initial;display:block;contain:content}");
    }

    css.push_str(&format!(
        ".tw-widget{{box-sizing:border-box;font-family:system-ui,-apple-system,'Segoe UI',Roboto,sans-serif;\
         font-size:14px;line-height:1.5;color:{text};background:{bg};padding:16px;max-width:100%}}\
         .tw-widget *{{box-sizing:border-box}}\
         .tw-title{{margin:0 0 12px;font-size:18px;font-weight:600;color:{primary}}}\
         .tw-track{{display:flex;gap:12px;overflow-x:auto;overflow-y:hidden;scroll-snap-type:x mandatory;\
         padding-bottom:8px;-webkit-overflow-scrolling:touch}}\
         .tw-card{{flex:0 0 {card}px;width:{card}px;scroll-snap-align:start;border:1px solid {border};\
         border-radius:8px;padding:14px;background:{bg};display:flex;flex-direction:column;gap:8px}}\
         .tw-stars{{font-size:14px;line-height:1;letter-spacing:2px;color:{accent};white-space:nowrap}}\
         .tw-star-empty{{opacity:.35}}\
         .tw-body{{margin:0;overflow-wrap:anywhere;white-space:pre-line}}\
         .tw-meta{{margin-top:auto;display:flex;justify-content:space-between;gap:8px;font-size:12px;opacity:.8}}\
         .tw-name{{font-weight:600}}\
         .tw-status,.tw-empty{{margin:0;padding:12px 0;opacity:.8}}\
         .tw-error{{border:1px solid {border};border-left:4px solid {accent};border-radius:6px;padding:12px}}\
         .tw-error-message{{margin:0;font-weight:600}}\
         .tw-error-hint{{margin:6px 0 0;font-size:12px}}\
         .tw-fallback-button{{margin-top:10px;font:inherit;color:{bg};background:{primary};border:0;\
         border-radius:4px;padding:6px 12px;cursor:pointer}}",
        text = theme.text,
        bg = theme.background,
        primary = theme.primary,
        border = theme.border,
        accent = theme.accent,
        card = CARD_WIDTH_PX,
    ));

    if animation {
        css.push_str(
            "@keyframes tw-fade-in{from{opacity:0;transform:translateY(6px)}to{opacity:1;transform:none}}\
             .tw-card{animation:tw-fade-in .35s ease-out both}\
             @media (prefers-reduced-motion:reduce){.tw-card{animation:none}}",
        );
    }

    css
}
