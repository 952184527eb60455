use std::fmt;

use serde::Deserialize;
use serde_json::{self,Map,Value};
use thiserror::Error;

use crate::points::*;

/*
A quadtree as written out by whatever built it. Nothing here builds or
queries a tree. The parsed document is kept as json and every field is read
only when the walk reaches its node, so a bad record fails where it sits.
*/

#[derive(Clone,Debug,PartialEq,Serialize,Deserialize)]
pub struct Boundary {
    pub center: CPoint2,
    pub half_size: f64,
}

impl Boundary {
    pub fn new(center: CPoint2, half_size: f64) -> Boundary {
        Boundary { center, half_size }
    }

    pub fn bottom_left(&self) -> CPoint2 {
        self.center - CPoint2::new(self.half_size, self.half_size)
    }

    pub fn side(&self) -> f64 {
        2.0 * self.half_size
    }

    pub fn contains(&self, point: &CPoint2) -> bool {
        self.center.x - self.half_size <= point.x
            && point.x <= self.center.x + self.half_size
            && self.center.y - self.half_size <= point.y
            && point.y <= self.center.y + self.half_size
    }
}

#[derive(Copy,Clone,Debug,PartialEq,Eq,Hash)]
pub enum Quadrant {
    Ne,
    Nw,
    Se,
    Sw,
}

impl Quadrant {
    pub const DRAW_ORDER: [Quadrant; 4] = [Quadrant::Ne, Quadrant::Nw, Quadrant::Se, Quadrant::Sw];

    pub fn key(self) -> &'static str {
        match self {
            Quadrant::Ne => "ne",
            Quadrant::Nw => "nw",
            Quadrant::Se => "se",
            Quadrant::Sw => "sw",
        }
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Error,Debug,Clone,PartialEq)]
pub enum ShapeError {
    #[error("node has no `{0}`")]
    MissingField(&'static str),
    #[error("divided node has no `{0}` child")]
    MissingChild(Quadrant),
    #[error("bad `{field}`: {reason}")]
    Malformed { field: &'static str, reason: String },
    #[error("expected a node, found {0}")]
    NotANode(&'static str),
}

fn malformed(field: &'static str, e: serde_json::Error) -> ShapeError {
    ShapeError::Malformed { field, reason: e.to_string() }
}

fn kind(value: &Value) -> &'static str {
    match *value {
        Value::Null => "null",
        Value::Bool(_) => "a bool",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// null, false, 0, "", [] and {} all count as nothing
pub fn truthy(value: &Value) -> bool {
    match *value {
        Value::Null => false,
        Value::Bool(b) => b,
        Value::Number(ref n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(ref s) => !s.is_empty(),
        Value::Array(ref a) => !a.is_empty(),
        Value::Object(ref o) => !o.is_empty(),
    }
}

/// One node of a parsed document, borrowed from it.
#[derive(Copy,Clone,Debug)]
pub struct Node<'a> {
    fields: &'a Map<String, Value>,
}

impl<'a> Node<'a> {
    // Ok(None) for an empty subtree
    pub fn from_value(value: &'a Value) -> Result<Option<Node<'a>>, ShapeError> {
        if !truthy(value) {
            return Ok(None);
        }
        match *value {
            Value::Object(ref fields) => Ok(Some(Node { fields })),
            ref other => Err(ShapeError::NotANode(kind(other))),
        }
    }

    fn field(&self, key: &'static str) -> Result<&'a Value, ShapeError> {
        self.fields.get(key).ok_or(ShapeError::MissingField(key))
    }

    pub fn boundary(&self) -> Result<Boundary, ShapeError> {
        Boundary::deserialize(self.field("boundary")?).map_err(|e| malformed("boundary", e))
    }

    // each point is only read when the iterator reaches it
    pub fn points(&self) -> Result<impl Iterator<Item = Result<CPoint2, ShapeError>> + 'a, ShapeError> {
        let raw = self.field("points")?;
        let items = raw.as_array().ok_or_else(|| ShapeError::Malformed {
            field: "points",
            reason: format!("expected an array, found {}", kind(raw)),
        })?;
        Ok(items.iter().map(|p| CPoint2::deserialize(p).map_err(|e| malformed("points", e))))
    }

    pub fn is_divided(&self) -> Result<bool, ShapeError> {
        self.field("divided").map(truthy)
    }

    pub fn capacity(&self) -> Option<u64> {
        self.fields.get("capacity").and_then(Value::as_u64)
    }

    // the raw slot; an empty one is a valid child
    pub fn child(&self, quadrant: Quadrant) -> Result<&'a Value, ShapeError> {
        self.fields.get(quadrant.key()).ok_or(ShapeError::MissingChild(quadrant))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(value: &Value) -> Node {
        Node::from_value(value).unwrap().unwrap()
    }

    #[test]
    fn reads_producer_output() {
        let doc = json!({
            "boundary": {"center": {"x": 0.0, "y": 0.0}, "half_size": 1000.0},
            "capacity": 4,
            "points": [{"x": 1.5, "y": -2.0}],
            "divided": false,
            "ne": null, "nw": null, "se": null, "sw": null
        });
        let n = node(&doc);
        assert_eq!(n.boundary(), Ok(Boundary::new(CPoint2::new(0.0, 0.0), 1000.0)));
        let pts: Vec<_> = n.points().unwrap().collect();
        assert_eq!(pts, vec![Ok(CPoint2::new(1.5, -2.0))]);
        assert_eq!(n.is_divided(), Ok(false));
        assert_eq!(n.capacity(), Some(4));
        for &q in Quadrant::DRAW_ORDER.iter() {
            assert_eq!(n.child(q), Ok(&Value::Null));
        }
    }

    #[test]
    fn falsy_values_are_empty_subtrees() {
        for empty in [json!(null), json!({}), json!(false), json!(0), json!([]), json!("")].iter() {
            assert!(Node::from_value(empty).unwrap().is_none(), "{} should be empty", empty);
        }
        assert_eq!(Node::from_value(&json!(5)).unwrap_err(), ShapeError::NotANode("a number"));
        assert_eq!(Node::from_value(&json!([1])).unwrap_err(), ShapeError::NotANode("an array"));
    }

    #[test]
    fn divided_follows_truthiness() {
        assert_eq!(node(&json!({"divided": null})).is_divided(), Ok(false));
        assert_eq!(node(&json!({"divided": 1})).is_divided(), Ok(true));
        assert_eq!(node(&json!({"points": []})).is_divided(), Err(ShapeError::MissingField("divided")));
    }

    #[test]
    fn missing_keys_surface_lazily() {
        let doc = json!({"points": [], "divided": true, "ne": null});
        let n = node(&doc);
        assert_eq!(n.boundary(), Err(ShapeError::MissingField("boundary")));
        assert_eq!(n.points().unwrap().count(), 0);
        assert_eq!(n.child(Quadrant::Ne), Ok(&Value::Null));
        assert_eq!(n.child(Quadrant::Sw), Err(ShapeError::MissingChild(Quadrant::Sw)));
    }

    #[test]
    fn bad_records_inside_fields_surface_lazily() {
        let doc = json!({
            "boundary": {"center": {"x": 0, "y": 0}},
            "points": [{"x": 1, "y": 1}, {"x": 2}],
            "divided": false
        });
        let n = node(&doc);
        match n.boundary() {
            Err(ShapeError::Malformed { field: "boundary", ref reason }) => assert!(reason.contains("half_size")),
            other => panic!("expected a bad boundary, got {:?}", other),
        }
        let mut pts = n.points().unwrap();
        assert_eq!(pts.next(), Some(Ok(CPoint2::new(1.0, 1.0))));
        match pts.next() {
            Some(Err(ShapeError::Malformed { field: "points", .. })) => {},
            other => panic!("expected a bad point, got {:?}", other),
        }

        let not_a_list = json!({"points": {"x": 1, "y": 1}});
        assert!(matches!(node(&not_a_list).points().err(), Some(ShapeError::Malformed { field: "points", .. })));
    }

    #[test]
    fn boundary_geometry() {
        let b = Boundary::new(CPoint2::new(0.0, 0.0), 10.0);
        assert_eq!(b.bottom_left(), CPoint2::new(-10.0, -10.0));
        assert_eq!(b.side(), 20.0);
        assert!(b.contains(&CPoint2::new(10.0, -10.0)));
        assert!(!b.contains(&CPoint2::new(10.5, 0.0)));
    }
}
