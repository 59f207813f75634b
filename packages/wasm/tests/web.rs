//! Browser smoke tests for the JavaScript facade.

#![cfg(target_arch = "wasm32")]

use annealed_layout_wasm::AnnealedLayoutWasm;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn options(graph_type: &str, num_nodes: u32, num_edges: u32) -> JsValue {
    let object = js_sys::Object::new();
    let set = |key: &str, value: JsValue| {
        js_sys::Reflect::set(&object, &JsValue::from_str(key), &value).unwrap();
    };
    set("graphType", JsValue::from_str(graph_type));
    set("numNodes", JsValue::from(num_nodes));
    set("numEdges", JsValue::from(num_edges));
    set("gridSpace", JsValue::from(5.0));
    object.into()
}

fn build(options: JsValue) -> AnnealedLayoutWasm {
    AnnealedLayoutWasm::new(options).map_err(JsValue::from).unwrap()
}

#[wasm_bindgen_test]
fn test_planar_layout_buffers() {
    let mut layout = build(options("2d", 12, 18));
    assert_eq!(layout.node_count(), 12);
    assert!(layout.edge_count() >= 18);

    assert_eq!(layout.step_many(100), 100);
    assert_eq!(layout.get_positions().length(), 12 * 3);
    assert_eq!(layout.get_edge_segments().length(), layout.edge_count() * 6);
    assert_eq!(layout.get_edge_pairs().length(), layout.edge_count() * 2);
    assert_eq!(layout.get_node_position(0).map(|p| p.len()), Some(3));
    assert!(layout.get_node_position(99).is_none());
}

#[wasm_bindgen_test]
fn test_restart_rebuilds() {
    let mut layout = build(options("3d", 6, 5));
    layout.step_many(20);
    layout.restart(options("2d", 20, 30)).map_err(JsValue::from).unwrap();
    assert_eq!(layout.node_count(), 20);
    assert!(!layout.is_finished());
    assert!(layout.state().map_err(JsValue::from).unwrap().is_object());
    assert!(layout.energy().map_err(JsValue::from).unwrap().is_object());
}

#[wasm_bindgen_test]
fn test_rejects_bad_options() {
    assert!(AnnealedLayoutWasm::new(options("2d", 0, 0)).is_err());
    assert!(AnnealedLayoutWasm::new(options("4d", 5, 4)).is_err());
    assert!(AnnealedLayoutWasm::new(JsValue::from(3)).is_err());
}
