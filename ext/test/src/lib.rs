//! pmatch-test: Test domain for conformance testing
//!
//! Provides small caller-defined subject types and named predicates and
//! projections over them. This is the reference extension that
//! demonstrates how to plug custom types into pmatch.
//!
//! # Example
//!
//! ```
//! use pmatch_test::prelude::*;
//!
//! let subject = Point::value(3, 4);
//! let pattern = Pattern::downcast::<Point>(Pattern::app(pmatch_test::point_x, 3));
//!
//! assert!(pattern.is_match(&subject));
//! assert!(!pattern.is_match(&Value::from((3, 4))));
//! ```

use pmatch::prelude::*;
use std::any::Any;
use std::sync::Arc;

#[cfg(feature = "fixtures")]
pub mod fixture;

/// A point on the plane: the test domain's product type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: i64,
    /// Vertical coordinate.
    pub y: i64,
}

impl Point {
    /// Create a point.
    #[must_use]
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Create a point wrapped as a [`Value`].
    #[must_use]
    pub fn value(x: i64, y: i64) -> Value {
        Value::Custom(Arc::new(Self::new(x, y)))
    }
}

impl CustomValue for Point {
    fn custom_type_name(&self) -> &'static str {
        "point"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn eq_custom(&self, other: &dyn CustomValue) -> bool {
        other.as_any().downcast_ref::<Self>() == Some(self)
    }
}

/// A figure on the plane: the test domain's closed sum type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Figure {
    /// A circle around `center`.
    Circle {
        /// Center point.
        center: Point,
        /// Radius.
        radius: i64,
    },
    /// A straight line between two points.
    Line {
        /// Start point.
        from: Point,
        /// End point.
        to: Point,
    },
}

impl Figure {
    /// Wrap as a [`Value`].
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Custom(Arc::new(self))
    }
}

impl CustomValue for Figure {
    fn custom_type_name(&self) -> &'static str {
        "figure"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn eq_custom(&self, other: &dyn CustomValue) -> bool {
        other.as_any().downcast_ref::<Self>() == Some(self)
    }
}

/// `x` of a [`Point`], or the absent value.
#[must_use]
pub fn point_x(value: &Value) -> Value {
    value
        .downcast_ref::<Point>()
        .map_or(Value::None, |p| Value::Int(p.x))
}

/// `y` of a [`Point`], or the absent value.
#[must_use]
pub fn point_y(value: &Value) -> Value {
    value
        .downcast_ref::<Point>()
        .map_or(Value::None, |p| Value::Int(p.y))
}

/// The center of a circle, or the absent value.
#[must_use]
pub fn circle_center(value: &Value) -> Value {
    match value.downcast_ref::<Figure>() {
        Some(Figure::Circle { center, .. }) => Value::Custom(Arc::new(*center)),
        _ => Value::None,
    }
}

/// The radius of a circle, or the absent value.
#[must_use]
pub fn circle_radius(value: &Value) -> Value {
    match value.downcast_ref::<Figure>() {
        Some(Figure::Circle { radius, .. }) => Value::Int(*radius),
        _ => Value::None,
    }
}

/// The endpoints of a line as a pair, or the absent value.
#[must_use]
pub fn line_endpoints(value: &Value) -> Value {
    match value.downcast_ref::<Figure>() {
        Some(Figure::Line { from, to }) => Value::Tuple(vec![
            Value::Custom(Arc::new(*from)),
            Value::Custom(Arc::new(*to)),
        ]),
        _ => Value::None,
    }
}

/// The characters of a string as a tuple, or the absent value.
///
/// Lets segment patterns scan strings.
#[must_use]
pub fn chars(value: &Value) -> Value {
    value.as_str().map_or(Value::None, |s| Value::tuple(s.chars()))
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{Figure, Point};
    pub use pmatch::prelude::*;
}

/// Register the test domain's predicates and projections, on top of
/// [`register_core`](pmatch::register_core).
///
/// | Name | Kind |
/// |------|------|
/// | `point`, `figure` | type predicates |
/// | `digit` | predicate: an ASCII digit `char` |
/// | `x`, `y` | projections of a [`Point`] |
/// | `center`, `radius` | projections of a circle |
/// | `endpoints` | projection of a line |
/// | `chars` | projection: string to tuple of chars |
#[cfg(feature = "registry")]
#[must_use]
pub fn register(builder: pmatch::RegistryBuilder) -> pmatch::RegistryBuilder {
    pmatch::register_core(builder)
        .predicate("point", pmatch::TypeMatcher::<Point>::new())
        .predicate("figure", pmatch::TypeMatcher::<Figure>::new())
        .predicate_fn("digit", |v| v.as_char().is_some_and(|c| c.is_ascii_digit()))
        .projection_fn("x", point_x)
        .projection_fn("y", point_y)
        .projection_fn("center", circle_center)
        .projection_fn("radius", circle_radius)
        .projection_fn("endpoints", line_endpoints)
        .projection_fn("chars", chars)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_compare_structurally() {
        assert_eq!(Point::value(1, 2), Point::value(1, 2));
        assert_ne!(Point::value(1, 2), Point::value(2, 1));
        assert_ne!(Point::value(1, 2), Value::from((1, 2)));
    }

    #[test]
    fn projections_of_the_wrong_type_are_absent() {
        assert_eq!(point_x(&Point::value(3, 4)), Value::from(3));
        assert_eq!(point_x(&Value::from(3)), Value::None);

        let line = Figure::Line {
            from: Point::new(0, 0),
            to: Point::new(1, 1),
        }
        .into_value();
        assert_eq!(circle_radius(&line), Value::None);
        assert_eq!(
            line_endpoints(&line),
            Value::Tuple(vec![Point::value(0, 0), Point::value(1, 1)])
        );
    }

    #[test]
    fn chars_of_a_string() {
        assert_eq!(chars(&Value::from("ab")), Value::from(('a', 'b')));
        assert_eq!(chars(&Value::from(1)), Value::None);
    }

    #[test]
    fn nested_custom_patterns() {
        let r = Capture::new("r");
        let circle_at_origin = Pattern::downcast::<Figure>(Pattern::and([
            Pattern::app(circle_center, Pattern::literal(Point::value(0, 0))),
            Pattern::app(circle_radius, &r),
        ]));

        let unit = Figure::Circle {
            center: Point::new(0, 0),
            radius: 1,
        }
        .into_value();
        let bindings = matches(&unit, &circle_at_origin).unwrap();
        assert_eq!(bindings[&r], Value::from(1));

        let moved = Figure::Circle {
            center: Point::new(1, 0),
            radius: 1,
        }
        .into_value();
        assert!(matches(&moved, &circle_at_origin).is_none());
    }

    #[cfg(feature = "registry")]
    #[test]
    fn register_adds_domain_names() {
        let registry = register(pmatch::RegistryBuilder::new()).build();
        assert!(registry.contains_predicate("even"));
        assert!(registry.contains_predicate("digit"));
        assert!(registry.contains_projection("chars"));
        assert!(registry.contains_projection("len"));
    }
}
