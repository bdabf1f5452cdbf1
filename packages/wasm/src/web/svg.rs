//! SVG render surface.
//!
//! Layout of the host `<svg>` element after a render:
//!
//! ```text
//! <svg width=W height=H viewBox="0 0 W H">
//!   <style/>
//!   <rect class="tc-background"/>          canvas clicks and drags
//!   <g class="tc-scene" transform=...>     the view transform
//!     <g class="tc-nodes">  <a><circle/></a> ...
//!     <g class="tc-badges"> <g data-cluster><rect/><text/></g> ...
//!   </g>
//!   <g class="tc-tooltip"/>                viewport coordinates
//! </svg>
//! ```

use std::cell::Cell;
use std::rc::Rc;

use log::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Event, EventTarget, MouseEvent, WheelEvent};

use crate::interaction::ViewTransform;
use crate::scene::{ClusterBadge, EventSink, NodeGlyph, RenderSurface, SceneEvent, Tooltip};

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Pointer travel (px) below which a press-release counts as a click.
const CLICK_SLOP: f64 = 3.0;

/// Approximate badge text width per character.
const BADGE_CHAR_WIDTH: f64 = 7.0;

const STYLE: &str = "
.tc-background { fill: transparent; cursor: grab; }
.tc-node circle { stroke: #ffffff; stroke-width: 1.5; cursor: pointer; }
.tc-node:hover circle, .tc-node:focus circle { stroke: #1f6feb; stroke-width: 3; }
.tc-node:focus { outline: none; }
.tc-badge { cursor: pointer; }
.tc-badge rect { fill: #ffffff; stroke-width: 1.5; rx: 10; }
.tc-badge text { font: 12px sans-serif; fill: #24292f; text-anchor: middle; dominant-baseline: middle; }
.tc-dimmed { opacity: 0.25; }
.tc-tooltip rect { fill: #ffffff; stroke: #d0d7de; rx: 6; }
.tc-tooltip text { font: 12px sans-serif; fill: #24292f; }
.tc-tooltip .tc-tooltip-title { font-weight: 600; }
";

/// An event listener removed from its target on drop.
struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn new(
        target: &EventTarget,
        kind: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, JsValue> {
        let callback = Closure::<dyn FnMut(Event)>::new(handler);
        target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            kind,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
    }
}

/// Groups recreated on every clear.
struct Layers {
    background: Element,
    scene: Element,
    nodes: Element,
    badges: Element,
    tooltip: Element,
}

/// A drawn element that dims when another cluster is highlighted.
struct ClusterMember {
    cluster: String,
    element: Element,
    class: &'static str,
}

/// In-progress drag.
#[derive(Debug, Clone, Copy)]
struct Drag {
    last_x: f64,
    last_y: f64,
    travel: f64,
}

/// Renders into an existing `<svg>` element.
pub struct SvgSurface {
    svg: Element,
    document: Document,
    layers: Option<Layers>,
    members: Vec<ClusterMember>,
    listeners: Vec<Listener>,
}

impl SvgSurface {
    pub fn new(svg: Element) -> Result<Self, JsValue> {
        let document = svg
            .owner_document()
            .ok_or_else(|| JsValue::from_str("svg element has no document"))?;
        Ok(Self {
            svg,
            document,
            layers: None,
            members: Vec::new(),
            listeners: Vec::new(),
        })
    }

    pub fn element(&self) -> &Element {
        &self.svg
    }

    fn create(&self, tag: &str, attrs: &[(&str, &str)]) -> Result<Element, JsValue> {
        let element = self.document.create_element_ns(Some(SVG_NS), tag)?;
        for (name, value) in attrs {
            element.set_attribute(name, value)?;
        }
        Ok(element)
    }

    fn build_layers(&self) -> Result<Layers, JsValue> {
        let style = self.create("style", &[])?;
        style.set_text_content(Some(STYLE));
        let background = self.create("rect", &[("class", "tc-background")])?;
        let scene = self.create("g", &[("class", "tc-scene")])?;
        let nodes = self.create("g", &[("class", "tc-nodes")])?;
        let badges = self.create("g", &[("class", "tc-badges")])?;
        let tooltip = self.create(
            "g",
            &[("class", "tc-tooltip"), ("visibility", "hidden"), ("pointer-events", "none")],
        )?;

        scene.append_child(&nodes)?;
        scene.append_child(&badges)?;
        for child in [&style, &background, &scene, &tooltip] {
            self.svg.append_child(child)?;
        }
        Ok(Layers {
            background,
            scene,
            nodes,
            badges,
            tooltip,
        })
    }

    fn try_draw_background(&self, width: f64, height: f64) -> Result<(), JsValue> {
        let (w, h) = (width.to_string(), height.to_string());
        self.svg.set_attribute("width", &w)?;
        self.svg.set_attribute("height", &h)?;
        self.svg.set_attribute("viewBox", &format!("0 0 {w} {h}"))?;
        if let Some(layers) = &self.layers {
            layers.background.set_attribute("width", &w)?;
            layers.background.set_attribute("height", &h)?;
        }
        Ok(())
    }

    fn try_draw_node(&mut self, glyph: &NodeGlyph) -> Result<(), JsValue> {
        let Some(layers) = &self.layers else {
            return Ok(());
        };
        let link = self.create(
            "a",
            &[
                ("class", "tc-node"),
                ("href", &glyph.url),
                ("target", "_blank"),
                ("rel", "noopener"),
                ("aria-label", &glyph.aria_label),
                ("data-cluster", &glyph.cluster),
            ],
        )?;
        let circle = self.create(
            "circle",
            &[
                ("cx", &glyph.x.to_string()),
                ("cy", &glyph.y.to_string()),
                ("r", &glyph.radius.to_string()),
                ("fill", &glyph.color),
            ],
        )?;
        link.append_child(&circle)?;
        layers.nodes.append_child(&link)?;
        self.members.push(ClusterMember {
            cluster: glyph.cluster.clone(),
            element: link,
            class: "tc-node",
        });
        Ok(())
    }

    fn try_draw_cluster(&mut self, badge: &ClusterBadge) -> Result<(), JsValue> {
        let Some(layers) = &self.layers else {
            return Ok(());
        };
        let width = badge.label.chars().count() as f64 * BADGE_CHAR_WIDTH + 16.0;
        let group = self.create(
            "g",
            &[
                ("class", "tc-badge"),
                ("data-cluster", &badge.name),
                ("role", "button"),
                ("aria-label", &format!("Focus cluster {}", badge.name)),
                ("transform", &format!("translate({},{})", badge.x, badge.y)),
            ],
        )?;
        let frame = self.create(
            "rect",
            &[
                ("x", &(-width / 2.0).to_string()),
                ("y", "-10"),
                ("width", &width.to_string()),
                ("height", "20"),
                ("stroke", &badge.color),
            ],
        )?;
        let text = self.create("text", &[])?;
        text.set_text_content(Some(&badge.label));
        group.append_child(&frame)?;
        group.append_child(&text)?;
        layers.badges.append_child(&group)?;
        self.members.push(ClusterMember {
            cluster: badge.name.clone(),
            element: group,
            class: "tc-badge",
        });
        Ok(())
    }

    fn try_install_gestures(&mut self, sink: EventSink) -> Result<(), JsValue> {
        self.listeners.clear();
        let target: &EventTarget = self.svg.as_ref();
        let drag: Rc<Cell<Option<Drag>>> = Rc::new(Cell::new(None));

        let svg = self.svg.clone();
        let pressed = drag.clone();
        self.listeners.push(Listener::new(target, "mousedown", move |event| {
            let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
                return;
            };
            if mouse.button() != 0 || hits(&event, "a") {
                return;
            }
            let (x, y) = local_point(&svg, mouse);
            pressed.set(Some(Drag {
                last_x: x,
                last_y: y,
                travel: 0.0,
            }));
        })?);

        let svg = self.svg.clone();
        let moving = drag.clone();
        let on_move = sink.clone();
        self.listeners.push(Listener::new(target, "mousemove", move |event| {
            let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
                return;
            };
            let (x, y) = local_point(&svg, mouse);
            match moving.get() {
                Some(mut state) => {
                    let (dx, dy) = (x - state.last_x, y - state.last_y);
                    state.last_x = x;
                    state.last_y = y;
                    state.travel += dx.abs() + dy.abs();
                    moving.set(Some(state));
                    if state.travel > CLICK_SLOP {
                        on_move(SceneEvent::Pan { dx, dy });
                    }
                }
                None => on_move(SceneEvent::PointerMove { x, y }),
            }
        })?);

        let released = drag.clone();
        let on_release = sink.clone();
        self.listeners.push(Listener::new(target, "mouseup", move |event| {
            let Some(state) = released.take() else {
                return;
            };
            if state.travel > CLICK_SLOP {
                return;
            }
            match cluster_at(&event) {
                Some(name) => on_release(SceneEvent::ClusterClick(name)),
                None => on_release(SceneEvent::BackgroundClick),
            }
        })?);

        let left = drag;
        let on_leave = sink.clone();
        self.listeners.push(Listener::new(target, "mouseleave", move |_| {
            left.set(None);
            on_leave(SceneEvent::PointerLeave);
        })?);

        let svg = self.svg.clone();
        let on_wheel = sink;
        self.listeners.push(Listener::new(target, "wheel", move |event| {
            let Some(wheel) = event.dyn_ref::<WheelEvent>() else {
                return;
            };
            event.prevent_default();
            let (x, y) = local_point(&svg, wheel);
            on_wheel(SceneEvent::Zoom {
                factor: wheel_factor(wheel),
                x,
                y,
            });
        })?);

        Ok(())
    }

    fn try_show_tooltip(&self, tooltip: Option<&Tooltip>) -> Result<(), JsValue> {
        let Some(layers) = &self.layers else {
            return Ok(());
        };
        let group = &layers.tooltip;
        let Some(tooltip) = tooltip else {
            return group.set_attribute("visibility", "hidden");
        };

        group.set_inner_html("");
        let frame = self.create(
            "rect",
            &[
                ("width", &crate::interaction::TOOLTIP_WIDTH.to_string()),
                ("height", "64"),
            ],
        )?;
        let title = self.create("text", &[("class", "tc-tooltip-title"), ("x", "10"), ("y", "22")])?;
        title.set_text_content(Some(&tooltip.title));
        let detail = self.create("text", &[("x", "10"), ("y", "44")])?;
        let comments = match tooltip.comments {
            1 => "1 comment".to_string(),
            n => format!("{n} comments"),
        };
        detail.set_text_content(Some(&format!("{} · {comments}", tooltip.cluster)));

        group.append_child(&frame)?;
        group.append_child(&title)?;
        group.append_child(&detail)?;
        group.set_attribute("transform", &format!("translate({},{})", tooltip.x, tooltip.y))?;
        group.set_attribute("visibility", "visible")
    }

    fn try_highlight(&self, name: Option<&str>) -> Result<(), JsValue> {
        for member in &self.members {
            let dimmed = name.is_some_and(|name| name != member.cluster);
            let class = if dimmed {
                format!("{} tc-dimmed", member.class)
            } else {
                member.class.to_string()
            };
            member.element.set_attribute("class", &class)?;
        }
        Ok(())
    }
}

/// Pointer position relative to the svg's top-left corner.
fn local_point(svg: &Element, event: &MouseEvent) -> (f64, f64) {
    let rect = svg.get_bounding_client_rect();
    (
        f64::from(event.client_x()) - rect.left(),
        f64::from(event.client_y()) - rect.top(),
    )
}

/// Zoom factor for one wheel event; line and page deltas are scaled up.
fn wheel_factor(event: &WheelEvent) -> f64 {
    let per_unit = match event.delta_mode() {
        WheelEvent::DOM_DELTA_LINE => 0.05,
        WheelEvent::DOM_DELTA_PAGE => 1.0,
        _ => 0.002,
    };
    2f64.powf(-event.delta_y() * per_unit)
}

fn event_element(event: &Event) -> Option<Element> {
    event.target()?.dyn_into::<Element>().ok()
}

fn hits(event: &Event, selector: &str) -> bool {
    event_element(event)
        .and_then(|element| element.closest(selector).ok().flatten())
        .is_some()
}

/// Name of the badge under the event target, if any.
fn cluster_at(event: &Event) -> Option<String> {
    event_element(event)?
        .closest(".tc-badge")
        .ok()
        .flatten()?
        .get_attribute("data-cluster")
}

impl RenderSurface for SvgSurface {
    fn clear(&mut self) {
        self.listeners.clear();
        self.members.clear();
        self.svg.set_inner_html("");
        self.layers = match self.build_layers() {
            Ok(layers) => Some(layers),
            Err(err) => {
                warn!("failed to build svg layers: {err:?}");
                None
            }
        };
    }

    fn draw_background(&mut self, width: f64, height: f64) {
        if let Err(err) = self.try_draw_background(width, height) {
            warn!("failed to size svg: {err:?}");
        }
    }

    fn draw_cluster(&mut self, badge: &ClusterBadge) {
        if let Err(err) = self.try_draw_cluster(badge) {
            warn!("failed to draw badge {:?}: {err:?}", badge.name);
        }
    }

    fn draw_node(&mut self, glyph: &NodeGlyph) {
        if let Err(err) = self.try_draw_node(glyph) {
            warn!("failed to draw node {}: {err:?}", glyph.id);
        }
    }

    fn install_gestures(&mut self, sink: EventSink) {
        if let Err(err) = self.try_install_gestures(sink) {
            warn!("failed to install gestures: {err:?}");
        }
    }

    fn apply_transform(&mut self, transform: &ViewTransform) {
        if let Some(layers) = &self.layers {
            if let Err(err) = layers.scene.set_attribute("transform", &transform.to_svg()) {
                warn!("failed to apply transform: {err:?}");
            }
        }
    }

    fn show_tooltip(&mut self, tooltip: Option<&Tooltip>) {
        if let Err(err) = self.try_show_tooltip(tooltip) {
            warn!("failed to update tooltip: {err:?}");
        }
    }

    fn highlight_cluster(&mut self, name: Option<&str>) {
        if let Err(err) = self.try_highlight(name) {
            warn!("failed to highlight cluster: {err:?}");
        }
    }
}
