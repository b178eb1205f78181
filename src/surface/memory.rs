//! In-Memory Surface
//!
//! Headless document, storage and clock for exercising the widgets without a
//! browser. Events are dispatched by hand: `click`, `resize`, `scroll_to`
//! and `ManualScheduler::advance`.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::rc::{Rc, Weak};
use std::time::Duration;

use super::{Click, ClickHandler, IntersectionHandler, PreferenceStore, ResizeHandler, Scheduler, Surface};
use crate::error::{UiError, UiResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

const ROOT: NodeId = NodeId(0);
const BODY: NodeId = NodeId(1);

#[derive(Debug, Default)]
struct Node {
    id: Option<String>,
    parent: Option<NodeId>,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    style: BTreeMap<String, String>,
    text: String,
}

struct ClickListener {
    el: NodeId,
    prevent_default: bool,
    handler: ClickHandler<NodeId>,
}

struct Observer {
    threshold: f64,
    elements: Vec<NodeId>,
    ratios: HashMap<NodeId, f64>,
    handler: IntersectionHandler<NodeId>,
}

pub struct MemorySurface {
    nodes: RefCell<Vec<Node>>,
    width: Cell<f64>,
    clicks: RefCell<Vec<ClickListener>>,
    resizes: RefCell<Vec<ResizeHandler>>,
    observers: RefCell<Vec<Observer>>,
}

impl MemorySurface {
    /// Empty document with `<html>` and `<body>`
    pub fn new(width: f64) -> Self {
        let root = Node::default();
        let body = Node {
            parent: Some(ROOT),
            ..Default::default()
        };
        Self {
            nodes: RefCell::new(vec![root, body]),
            width: Cell::new(width),
            clicks: RefCell::new(Vec::new()),
            resizes: RefCell::new(Vec::new()),
            observers: RefCell::new(Vec::new()),
        }
    }

    /// Append an element to `<body>`
    pub fn add_element(&self, id: Option<&str>, classes: &str) -> NodeId {
        self.add_child(BODY, id, classes)
    }

    pub fn add_child(&self, parent: NodeId, id: Option<&str>, classes: &str) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(Node {
            id: id.map(str::to_string),
            parent: Some(parent),
            classes: classes.split_whitespace().map(str::to_string).collect(),
            ..Default::default()
        });
        NodeId(nodes.len() - 1)
    }

    /// Click `target` and bubble to its ancestors. Returns whether any
    /// listener suppressed the default action.
    pub fn click(&self, target: NodeId) -> bool {
        let mut path = vec![target];
        {
            let nodes = self.nodes.borrow();
            let mut current = nodes[target.0].parent;
            while let Some(node) = current {
                path.push(node);
                current = nodes[node.0].parent;
            }
        }

        let mut prevented = false;
        for node in path {
            let handlers: Vec<(bool, ClickHandler<NodeId>)> = self
                .clicks
                .borrow()
                .iter()
                .filter(|l| l.el == node)
                .map(|l| (l.prevent_default, l.handler.clone()))
                .collect();
            for (prevent_default, handler) in handlers {
                prevented |= prevent_default;
                handler(&Click {
                    current: node,
                    target: Some(target),
                });
            }
        }
        prevented
    }

    /// Change the viewport width and fire resize listeners
    pub fn resize(&self, width: f64) {
        self.width.set(width);
        let handlers: Vec<ResizeHandler> = self.resizes.borrow().clone();
        for handler in handlers {
            handler(width);
        }
    }

    /// Report `ratio` of `el` as visible. Observers fire when the ratio
    /// crosses their threshold in either direction.
    pub fn scroll_to(&self, el: NodeId, ratio: f64) {
        let mut fired = Vec::new();
        for observer in self.observers.borrow_mut().iter_mut() {
            if !observer.elements.contains(&el) {
                continue;
            }
            let previous = observer.ratios.insert(el, ratio).unwrap_or(0.0);
            let was = previous >= observer.threshold;
            let now = ratio >= observer.threshold;
            if was != now {
                fired.push((observer.handler.clone(), now));
            }
        }
        for (handler, intersecting) in fired {
            handler(&el, intersecting);
        }
    }

    pub fn click_listener_count(&self) -> usize {
        self.clicks.borrow().len()
    }

    fn matches(node: &Node, selector: &str) -> bool {
        if let Some(class) = selector.strip_prefix('.') {
            node.classes.iter().any(|c| c == class)
        } else if let Some(id) = selector.strip_prefix('#') {
            node.id.as_deref() == Some(id)
        } else {
            false
        }
    }
}

impl Surface for MemorySurface {
    type Element = NodeId;

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.nodes
            .borrow()
            .iter()
            .position(|n| n.id.as_deref() == Some(id))
            .map(NodeId)
    }

    fn root(&self) -> Option<NodeId> {
        Some(ROOT)
    }

    fn body(&self) -> Option<NodeId> {
        Some(BODY)
    }

    fn select_all(&self, selector: &str) -> Vec<NodeId> {
        let parts: Vec<&str> = selector.split(',').map(str::trim).collect();
        self.nodes
            .borrow()
            .iter()
            .enumerate()
            .filter(|(_, node)| parts.iter().any(|p| Self::matches(node, p)))
            .map(|(i, _)| NodeId(i))
            .collect()
    }

    fn add_class(&self, el: &NodeId, class: &str) {
        let mut nodes = self.nodes.borrow_mut();
        let classes = &mut nodes[el.0].classes;
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
        }
    }

    fn remove_class(&self, el: &NodeId, class: &str) {
        self.nodes.borrow_mut()[el.0].classes.retain(|c| c != class);
    }

    fn has_class(&self, el: &NodeId, class: &str) -> bool {
        self.nodes.borrow()[el.0].classes.iter().any(|c| c == class)
    }

    fn class_name(&self, el: &NodeId) -> String {
        self.nodes.borrow()[el.0].classes.join(" ")
    }

    fn set_class_name(&self, el: &NodeId, value: &str) {
        self.nodes.borrow_mut()[el.0].classes =
            value.split_whitespace().map(str::to_string).collect();
    }

    fn set_attribute(&self, el: &NodeId, name: &str, value: &str) {
        self.nodes.borrow_mut()[el.0]
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    fn remove_attribute(&self, el: &NodeId, name: &str) {
        self.nodes.borrow_mut()[el.0].attributes.remove(name);
    }

    fn attribute(&self, el: &NodeId, name: &str) -> Option<String> {
        self.nodes.borrow()[el.0].attributes.get(name).cloned()
    }

    fn set_style(&self, el: &NodeId, property: &str, value: &str) {
        let mut nodes = self.nodes.borrow_mut();
        let style = &mut nodes[el.0].style;
        if value.is_empty() {
            style.remove(property);
        } else {
            style.insert(property.to_string(), value.to_string());
        }
    }

    fn style(&self, el: &NodeId, property: &str) -> String {
        self.nodes.borrow()[el.0]
            .style
            .get(property)
            .cloned()
            .unwrap_or_default()
    }

    fn set_text(&self, el: &NodeId, text: &str) {
        self.nodes.borrow_mut()[el.0].text = text.to_string();
    }

    fn text(&self, el: &NodeId) -> String {
        self.nodes.borrow()[el.0].text.clone()
    }

    fn viewport_width(&self) -> f64 {
        self.width.get()
    }

    fn on_click(&self, el: &NodeId, prevent_default: bool, handler: ClickHandler<NodeId>) {
        self.clicks.borrow_mut().push(ClickListener {
            el: *el,
            prevent_default,
            handler,
        });
    }

    fn on_resize(&self, handler: ResizeHandler) {
        self.resizes.borrow_mut().push(handler);
    }

    fn observe_intersection(
        &self,
        elements: &[NodeId],
        threshold: f64,
        handler: IntersectionHandler<NodeId>,
    ) {
        self.observers.borrow_mut().push(Observer {
            threshold,
            elements: elements.to_vec(),
            ratios: HashMap::new(),
            handler,
        });
    }
}

/// Local-storage stand-in
#[derive(Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, String>>,
    read_only: Cell<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        store
    }

    /// Make every write fail, like a browser with storage disabled
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.set(read_only);
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> UiResult<()> {
        if self.read_only.get() {
            return Err(UiError::Storage(format!("cannot write {}", key)));
        }
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

struct PendingTask {
    id: u64,
    due: Duration,
    task: Box<dyn FnOnce()>,
}

#[derive(Default)]
struct TaskQueue {
    now: Duration,
    next_id: u64,
    tasks: Vec<PendingTask>,
}

/// Clock that only moves when told to
#[derive(Default)]
pub struct ManualScheduler {
    queue: Rc<RefCell<TaskQueue>>,
}

/// Cancels its task on drop
pub struct ManualHandle {
    id: u64,
    queue: Weak<RefCell<TaskQueue>>,
}

impl Drop for ManualHandle {
    fn drop(&mut self) {
        if let Some(queue) = self.queue.upgrade() {
            // Tasks are run with the queue released, so this never conflicts
            if let Ok(mut queue) = queue.try_borrow_mut() {
                queue.tasks.retain(|t| t.id != self.id);
            }
        }
    }
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward, running every task that falls due in order
    pub fn advance(&self, by: Duration) {
        let target = self.queue.borrow().now + by;
        loop {
            let next = {
                let mut queue = self.queue.borrow_mut();
                let due = queue
                    .tasks
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.due <= target)
                    .min_by_key(|(_, t)| (t.due, t.id))
                    .map(|(i, _)| i);
                match due {
                    Some(i) => {
                        let task = queue.tasks.remove(i);
                        queue.now = task.due;
                        Some(task.task)
                    }
                    None => {
                        queue.now = target;
                        None
                    }
                }
            };
            match next {
                Some(task) => task(),
                None => break,
            }
        }
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().tasks.len()
    }
}

impl Scheduler for ManualScheduler {
    type Handle = ManualHandle;

    fn defer(&self, delay: Duration, task: Box<dyn FnOnce()>) -> ManualHandle {
        let mut queue = self.queue.borrow_mut();
        let id = queue.next_id;
        queue.next_id += 1;
        let due = queue.now + delay;
        queue.tasks.push(PendingTask { id, due, task });
        ManualHandle {
            id,
            queue: Rc::downgrade(&self.queue),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_all_matches_classes_and_ids() {
        let surface = MemorySurface::new(1200.0);
        let a = surface.add_element(None, "card-hover");
        let _b = surface.add_element(None, "plain");
        let c = surface.add_element(Some("x"), "animate-fade-in");

        assert_eq!(surface.select_all(".animate-fade-in, .card-hover"), vec![a, c]);
        assert_eq!(surface.select_all("#x"), vec![c]);
    }

    #[test]
    fn test_click_bubbles_to_ancestors() {
        let surface = MemorySurface::new(1200.0);
        let outer = surface.add_element(Some("outer"), "");
        let inner = surface.add_child(outer, None, "");
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();
        surface.on_click(&outer, true, Rc::new(move |click: &Click<NodeId>| {
            log.borrow_mut().push(click.is_direct())
        }));

        assert!(surface.click(inner));
        assert!(surface.click(outer));
        assert_eq!(*seen.borrow(), vec![false, true]);
    }

    #[test]
    fn test_scheduler_runs_due_tasks_only() {
        let scheduler = ManualScheduler::new();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let _handle = scheduler.defer(Duration::from_millis(100), Box::new(move || h.set(h.get() + 1)));

        scheduler.advance(Duration::from_millis(99));
        assert_eq!(hits.get(), 0);
        scheduler.advance(Duration::from_millis(1));
        assert_eq!(hits.get(), 1);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_dropped_handle_cancels() {
        let scheduler = ManualScheduler::new();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let handle = scheduler.defer(Duration::from_millis(10), Box::new(move || h.set(1)));
        drop(handle);

        scheduler.advance(Duration::from_secs(1));
        assert_eq!(hits.get(), 0);
    }
}
