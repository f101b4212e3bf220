#![cfg(target_arch = "wasm32")]

use backdrop_wasm::{document_scroll_progress, ShaderBackground};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn mount_point(id: &str) -> web_sys::Element {
    let document = web_sys::window().unwrap().document().unwrap();
    let element = document.create_element("div").unwrap();
    element.set_id(id);
    document.body().unwrap().append_child(&element).unwrap();
    element
}

#[wasm_bindgen_test]
fn mount_inserts_one_canvas_and_unmount_removes_it() {
    let host = mount_point("bg-lifecycle");
    let mut background =
        ShaderBackground::new("bg-lifecycle", Some(r#"{"theme":"gold"}"#.to_string())).unwrap();

    // Without WebGL2 the background degrades to drawing nothing.
    if background.is_running() {
        assert_eq!(host.child_element_count(), 1);
        let canvas = host.first_element_child().unwrap();
        assert_eq!(canvas.tag_name().to_lowercase(), "canvas");
    } else {
        assert_eq!(host.child_element_count(), 0);
    }

    background.set_theme("blue");
    background.set_scroll_progress(0.5);
    background.unmount();
    background.unmount();
    assert!(!background.is_running());
    assert_eq!(host.child_element_count(), 0);
    host.remove();
}

#[wasm_bindgen_test]
fn missing_mount_point_degrades_quietly() {
    let background = ShaderBackground::new("no-such-element", None).unwrap();
    assert!(!background.is_running());
}

#[wasm_bindgen_test]
fn invalid_config_falls_back_to_defaults() {
    let host = mount_point("bg-bad-config");
    let mut background =
        ShaderBackground::new("bg-bad-config", Some("{not json".to_string())).unwrap();
    background.unmount();
    assert_eq!(host.child_element_count(), 0);
    host.remove();
}

#[wasm_bindgen_test]
fn scroll_progress_is_normalized() {
    let progress = document_scroll_progress();
    assert!((0.0..=1.0).contains(&progress));
}

#[wasm_bindgen_test]
fn page_scroll_attaches_once_and_detaches_on_unmount() {
    let host = mount_point("bg-scroll");
    let mut background = ShaderBackground::new("bg-scroll", None).unwrap();
    background.attach_page_scroll().unwrap();
    background.attach_page_scroll().unwrap();
    assert_eq!(background.is_following_page_scroll(), background.is_running());

    background.unmount();
    assert!(!background.is_following_page_scroll());
    background.attach_page_scroll().unwrap();
    assert!(!background.is_following_page_scroll());
    host.remove();
}
