//! Business-process notation: events, tasks, gateways, containers
//!
//! The shape schema is generic; everything business-specific lives in the
//! `props` bag (`EventType`, `TaskType`, `GatewayType`, `LoopType`, ...)
//! and is mapped here onto fixed marker tables.

use crate::model::{Connection, Shape};
use crate::style::Style;
use crate::theme::Theme;

use super::{
    base_edge_style, base_shape_style, push_strip_marker, EdgeRouting, EdgeUnit,
    NotationTemplates, SubUnit, VisualUnit, MARKER_SIZE,
};

pub struct BusinessProcessTemplates;

/// Closed vocabulary of the business-process notation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShapeKind {
    StartEvent,
    IntermediateEvent,
    BoundaryEvent,
    EndEvent,
    Task,
    SubProcess,
    CallActivity,
    Gateway,
    Pool,
    Lane,
    Group,
    DataObject,
    DataStore,
    TextAnnotation,
}

impl ShapeKind {
    fn parse(type_name: &str) -> Option<Self> {
        Some(match type_name {
            "StartEvent" => ShapeKind::StartEvent,
            "IntermediateEvent" => ShapeKind::IntermediateEvent,
            "BoundaryEvent" => ShapeKind::BoundaryEvent,
            "EndEvent" => ShapeKind::EndEvent,
            "Task" => ShapeKind::Task,
            "SubProcess" => ShapeKind::SubProcess,
            "CallActivity" => ShapeKind::CallActivity,
            "Gateway" => ShapeKind::Gateway,
            "Pool" => ShapeKind::Pool,
            "Lane" => ShapeKind::Lane,
            "Group" => ShapeKind::Group,
            "DataObject" => ShapeKind::DataObject,
            "DataStore" => ShapeKind::DataStore,
            "TextAnnotation" => ShapeKind::TextAnnotation,
            _ => return None,
        })
    }
}

/// Event trigger sub-types, selected by the `EventType` prop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EventTrigger {
    Unspecified,
    Message,
    Timer,
    Error,
    Escalation,
    Cancel,
    Compensation,
    Conditional,
    LinkCatch,
    LinkThrow,
    Signal,
    Terminate,
    Multiple,
    ParallelMultiple,
}

impl EventTrigger {
    fn parse(value: Option<&str>) -> Self {
        match value {
            Some("Message") => EventTrigger::Message,
            Some("Timer") => EventTrigger::Timer,
            Some("Error") => EventTrigger::Error,
            Some("Escalation") => EventTrigger::Escalation,
            Some("Cancel") => EventTrigger::Cancel,
            Some("Compensation") => EventTrigger::Compensation,
            Some("Conditional") => EventTrigger::Conditional,
            Some("LinkCatch") => EventTrigger::LinkCatch,
            Some("LinkThrow") => EventTrigger::LinkThrow,
            Some("Signal") => EventTrigger::Signal,
            Some("Terminate") => EventTrigger::Terminate,
            Some("Multiple") => EventTrigger::Multiple,
            Some("ParallelMultiple") => EventTrigger::ParallelMultiple,
            _ => EventTrigger::Unspecified,
        }
    }

    /// Stencil name and whether the glyph is drawn filled
    fn marker(&self) -> Option<(&'static str, bool)> {
        Some(match self {
            EventTrigger::Unspecified => return None,
            EventTrigger::Message => ("trigger-message", false),
            EventTrigger::Timer => ("trigger-timer", false),
            EventTrigger::Error => ("trigger-error", false),
            EventTrigger::Escalation => ("trigger-escalation", false),
            EventTrigger::Cancel => ("trigger-cancel", false),
            EventTrigger::Compensation => ("trigger-compensation", false),
            EventTrigger::Conditional => ("trigger-conditional", false),
            EventTrigger::LinkCatch => ("trigger-link", false),
            EventTrigger::LinkThrow => ("trigger-link", true),
            EventTrigger::Signal => ("trigger-signal", false),
            EventTrigger::Terminate => ("trigger-terminate", true),
            EventTrigger::Multiple => ("trigger-multiple", false),
            EventTrigger::ParallelMultiple => ("trigger-parallel-multiple", false),
        })
    }
}

/// Gateway variants, selected by the `GatewayType` prop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GatewayVariant {
    Blank,
    Exclusive,
    ExclusiveMarked,
    Inclusive,
    Parallel,
    Complex,
    EventBased,
    ExclusiveEventBased,
    ParallelEventBased,
}

impl GatewayVariant {
    fn parse(value: Option<&str>) -> Self {
        match value {
            Some("Exclusive") => GatewayVariant::Exclusive,
            Some("ExclusiveMarked") => GatewayVariant::ExclusiveMarked,
            Some("Inclusive") => GatewayVariant::Inclusive,
            Some("Parallel") => GatewayVariant::Parallel,
            Some("Complex") => GatewayVariant::Complex,
            Some("EventBased") => GatewayVariant::EventBased,
            Some("ExclusiveEventBased") => GatewayVariant::ExclusiveEventBased,
            Some("ParallelEventBased") => GatewayVariant::ParallelEventBased,
            _ => GatewayVariant::Blank,
        }
    }

    fn marker(&self) -> Option<&'static str> {
        Some(match self {
            GatewayVariant::Blank | GatewayVariant::Exclusive => return None,
            GatewayVariant::ExclusiveMarked => "gateway-x",
            GatewayVariant::Inclusive => "gateway-circle",
            GatewayVariant::Parallel => "gateway-plus",
            GatewayVariant::Complex => "gateway-asterisk",
            GatewayVariant::EventBased => "gateway-event",
            GatewayVariant::ExclusiveEventBased => "gateway-event-exclusive",
            GatewayVariant::ParallelEventBased => "gateway-event-parallel",
        })
    }
}

/// Task-type corner markers, selected by the `TaskType` prop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TaskType {
    User,
    Service,
    Script,
    BusinessRule,
    Manual,
    Send,
    Receive,
    InstantiatingReceive,
}

impl TaskType {
    fn parse(value: Option<&str>) -> Option<Self> {
        Some(match value? {
            "User" => TaskType::User,
            "Service" => TaskType::Service,
            "Script" => TaskType::Script,
            "BusinessRule" => TaskType::BusinessRule,
            "Manual" => TaskType::Manual,
            "Send" => TaskType::Send,
            "Receive" => TaskType::Receive,
            "InstantiatingReceive" => TaskType::InstantiatingReceive,
            _ => return None,
        })
    }

    fn marker(&self) -> &'static str {
        match self {
            TaskType::User => "task-user",
            TaskType::Service => "task-service",
            TaskType::Script => "task-script",
            TaskType::BusinessRule => "task-business-rule",
            TaskType::Manual => "task-manual",
            TaskType::Send => "task-send",
            TaskType::Receive => "task-receive",
            TaskType::InstantiatingReceive => "task-receive-instantiating",
        }
    }
}

/// Centered sub-unit used for event triggers and gateway glyphs
fn center_marker(stencil: &str, filled: bool, theme: &Theme) -> SubUnit {
    let fill = if filled {
        theme.resolve("marker-stroke")
    } else {
        theme.resolve("marker-fill")
    };
    SubUnit {
        style: Style::new()
            .with("shape", stencil)
            .with("fillColor", fill)
            .with("strokeColor", theme.resolve("marker-stroke")),
        fraction: crate::geometry::Point::new(0.5, 0.5),
        offset: crate::geometry::Point::new(-MARKER_SIZE / 2.0, -MARKER_SIZE / 2.0),
        width: MARKER_SIZE,
        height: MARKER_SIZE,
        label: None,
    }
}

fn marker_style(stencil: &str, theme: &Theme) -> Style {
    Style::new()
        .with("shape", stencil)
        .with("fillColor", theme.resolve("marker-fill"))
        .with("strokeColor", theme.resolve("marker-stroke"))
}

/// Bottom strip for activity markers. Activation order is fixed: loop,
/// ad-hoc, compensation, collapsed; each newly active marker shifts the
/// already-placed ones one slot left.
fn activity_strip(shape: &Shape, collapsed: bool, theme: &Theme) -> Vec<SubUnit> {
    let mut strip = Vec::new();
    let loop_marker = match shape.prop_str("LoopType") {
        Some("Standard") => Some("marker-loop"),
        Some("ParallelMultiInstance") => Some("marker-multi-parallel"),
        Some("SequentialMultiInstance") => Some("marker-multi-sequential"),
        _ => None,
    };
    if let Some(stencil) = loop_marker {
        push_strip_marker(&mut strip, SubUnit::bottom_marker(marker_style(stencil, theme)));
    }
    if shape.prop_bool("AdHoc") {
        push_strip_marker(
            &mut strip,
            SubUnit::bottom_marker(marker_style("marker-adhoc", theme)),
        );
    }
    if shape.prop_bool("IsForCompensation") {
        push_strip_marker(
            &mut strip,
            SubUnit::bottom_marker(marker_style("marker-compensation", theme)),
        );
    }
    if collapsed {
        push_strip_marker(
            &mut strip,
            SubUnit::bottom_marker(marker_style("marker-collapsed", theme)),
        );
    }
    strip
}

fn event(shape: &Shape, theme: &Theme, stroke_width: f64, dashed: bool) -> VisualUnit {
    let mut style =
        base_shape_style("ellipse", shape, theme, "shape-fill", "shape-stroke");
    if shape.stroke_width.is_none() {
        style = style.with("strokeWidth", stroke_width);
    }
    if dashed && shape.stroke_dash_pattern.is_none() {
        style = style.with("dashed", 1).with("dashPattern", "3 3");
    }
    let mut unit = VisualUnit::new(style).with_label(shape.label.clone());
    let trigger = EventTrigger::parse(shape.prop_str("EventType"));
    if let Some((stencil, filled)) = trigger.marker() {
        unit.children.push(center_marker(stencil, filled, theme));
    }
    unit
}

/// Double-ring inner ellipse for intermediate and boundary events
fn inner_ring(shape: &Shape, theme: &Theme) -> SubUnit {
    const INSET: f64 = 3.0;
    SubUnit {
        style: Style::new()
            .with("shape", "ellipse")
            .with("fillColor", "none")
            .with("strokeColor", theme.resolve("shape-stroke")),
        fraction: crate::geometry::Point::new(0.0, 0.0),
        offset: crate::geometry::Point::new(INSET, INSET),
        width: (shape.width - 2.0 * INSET).max(0.0),
        height: (shape.height - 2.0 * INSET).max(0.0),
        label: None,
    }
}

fn activity(shape: &Shape, theme: &Theme, collapsed_prop: bool) -> VisualUnit {
    let style = base_shape_style("rectangle", shape, theme, "shape-fill", "shape-stroke")
        .with("rounded", 1);
    let mut unit = VisualUnit::new(style).with_label(shape.label.clone());
    if let Some(task_type) = TaskType::parse(shape.prop_str("TaskType")) {
        unit.children
            .push(SubUnit::corner_marker(marker_style(task_type.marker(), theme)));
    }
    let collapsed = collapsed_prop && shape.prop_bool("Collapsed");
    unit.children
        .extend(activity_strip(shape, collapsed, theme));
    unit
}

impl NotationTemplates for BusinessProcessTemplates {
    fn render_shape(&self, shape: &Shape, theme: &Theme) -> Option<VisualUnit> {
        let kind = ShapeKind::parse(&shape.shape_type)?;
        let unit = match kind {
            ShapeKind::StartEvent => event(shape, theme, 1.0, false),
            ShapeKind::IntermediateEvent => {
                let mut unit = event(shape, theme, 1.0, false);
                unit.children.insert(0, inner_ring(shape, theme));
                unit
            }
            ShapeKind::BoundaryEvent => {
                let mut unit = event(shape, theme, 1.0, true);
                unit.children.insert(0, inner_ring(shape, theme));
                unit
            }
            ShapeKind::EndEvent => event(shape, theme, 3.0, false),
            ShapeKind::Task => activity(shape, theme, false),
            ShapeKind::SubProcess | ShapeKind::CallActivity => {
                let mut unit = activity(shape, theme, true);
                if kind == ShapeKind::CallActivity && shape.stroke_width.is_none() {
                    unit.style = unit.style.with("strokeWidth", 3);
                }
                unit
            }
            ShapeKind::Gateway => {
                let style =
                    base_shape_style("rhombus", shape, theme, "shape-fill", "shape-stroke");
                let mut unit = VisualUnit::new(style).with_label(shape.label.clone());
                let variant = GatewayVariant::parse(shape.prop_str("GatewayType"));
                if let Some(stencil) = variant.marker() {
                    unit.children.push(center_marker(stencil, false, theme));
                }
                unit
            }
            ShapeKind::Pool => {
                let style = base_shape_style(
                    "rectangle",
                    shape,
                    theme,
                    "container-fill",
                    "container-stroke",
                );
                VisualUnit::new(style).with_label(shape.label.clone())
            }
            ShapeKind::Lane => {
                let style = base_shape_style(
                    "rectangle",
                    shape,
                    theme,
                    "container-fill",
                    "container-stroke",
                )
                .with("align", "left");
                VisualUnit::new(style).with_label(shape.label.clone())
            }
            ShapeKind::Group => {
                let style = Style::new()
                    .with("shape", "rectangle")
                    .with("rounded", 1)
                    .with("fillColor", "none")
                    .with("strokeColor", theme.resolve("annotation-stroke"))
                    .with("dashed", 1)
                    .with("dashPattern", "8 3 1 3")
                    .with("group", 1);
                VisualUnit::group(style).with_label(shape.label.clone())
            }
            ShapeKind::DataObject => {
                let style =
                    base_shape_style("data-object", shape, theme, "shape-fill", "shape-stroke");
                VisualUnit::new(style).with_label(shape.label.clone())
            }
            ShapeKind::DataStore => {
                let style =
                    base_shape_style("data-store", shape, theme, "shape-fill", "shape-stroke");
                VisualUnit::new(style).with_label(shape.label.clone())
            }
            ShapeKind::TextAnnotation => {
                let style = base_shape_style(
                    "annotation",
                    shape,
                    theme,
                    "shape-fill",
                    "annotation-stroke",
                )
                .with("align", "left");
                VisualUnit::new(style).with_label(shape.label.clone())
            }
        };
        Some(unit)
    }

    fn connector(&self, conn: &Connection, theme: &Theme) -> EdgeUnit {
        let mut unit = base_edge_style(conn, theme, EdgeRouting::RightAngled);
        // Sequence flows default to a solid arrowhead
        if !unit.style.contains("endArrow") {
            unit.style = unit.style.with("endArrow", "block");
        }
        unit
    }
}
