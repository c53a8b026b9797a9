//! Renders a walk into the three commit-text flavors ENTER/Ctrl-ENTER can
//! produce, per the active `CtrlEnterBehavior`.

use bopomofo_core::grid::WalkResult;

pub fn plain_text(walk: &WalkResult) -> String {
    walk.nodes.iter().map(|n| n.value.as_str()).collect()
}

pub fn bpmf_readings(walk: &WalkResult, separator: &str) -> String {
    walk.nodes.iter().map(|n| n.reading.as_str()).collect::<Vec<_>>().join(separator)
}

pub fn html_ruby(walk: &WalkResult) -> String {
    walk.nodes.iter().map(|n| format!("<ruby>{}<rt>{}</rt></ruby>", n.value, n.reading)).collect()
}
