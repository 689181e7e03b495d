//! Metric-driven symbology for the trips layer.
//!
//! Height and color are two curves over the same breakpoints, both evaluated
//! with exponential interpolation. The renderer receives them as declarative
//! expressions; the Rust evaluation mirrors what it will draw.

use foundation::color::{ColorParseError, Rgba};
use serde_json::{Value, json};

/// Feature property holding the trip count of a tile cell.
pub const TRIPS_PROPERTY: &str = "trips";
pub const TRIPS_EXPONENTIAL_BASE: f64 = 1.3;
pub const TRIPS_OPACITY: f64 = 0.75;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Breakpoint {
    pub metric: f64,
    /// Extrusion height in pixels.
    pub height: f64,
    pub color: Rgba,
}

impl Breakpoint {
    pub const fn new(metric: f64, height: f64, color: Rgba) -> Self {
        Self {
            metric,
            height,
            color,
        }
    }
}

// (trips, height px, fill color)
const TRIPS_STOPS: [(f64, f64, &str); 5] = [
    (17.0, 10.0, "#f2a8ff"),
    (1204.0, 100.0, "#dc70ff"),
    (2526.0, 200.0, "#bc39fe"),
    (4738.0, 400.0, "#9202fd"),
    (6249.0, 600.0, "#6002c5"),
];

#[derive(Debug, Clone, PartialEq)]
pub enum EncodingError {
    Empty,
    BadMetric { index: usize },
    NotIncreasing { index: usize },
    BadBase(f64),
    Color(ColorParseError),
}

impl From<ColorParseError> for EncodingError {
    fn from(err: ColorParseError) -> Self {
        EncodingError::Color(err)
    }
}

impl std::fmt::Display for EncodingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EncodingError::Empty => write!(f, "encoding table has no breakpoints"),
            EncodingError::BadMetric { index } => {
                write!(f, "breakpoint {index} needs a finite, non-negative metric")
            }
            EncodingError::NotIncreasing { index } => {
                write!(f, "breakpoint {index} does not increase the metric")
            }
            EncodingError::BadBase(base) => {
                write!(f, "interpolation base must be positive and finite, got {base}")
            }
            EncodingError::Color(err) => write!(f, "bad breakpoint color: {err}"),
        }
    }
}

impl std::error::Error for EncodingError {}

/// Interpolation weight for normalized progress `t` in `0..=1`.
///
/// `(base^t - 1) / (base - 1)`; a base of 1 degenerates to linear.
pub fn exponential_weight(base: f64, t: f64) -> f64 {
    if (base - 1.0).abs() < f64::EPSILON {
        return t;
    }
    (base.powf(t) - 1.0) / (base - 1.0)
}

#[derive(Debug, Copy, Clone, PartialEq)]
enum Segment {
    At(usize),
    Between { lower: usize, weight: f64 },
}

/// Ordered breakpoints shared by the height and color curves.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodingTable {
    property: String,
    base: f64,
    opacity: f64,
    breakpoints: Vec<Breakpoint>,
}

impl EncodingTable {
    pub fn new(
        property: impl Into<String>,
        base: f64,
        opacity: f64,
        breakpoints: Vec<Breakpoint>,
    ) -> Result<Self, EncodingError> {
        if !(base.is_finite() && base > 0.0) {
            return Err(EncodingError::BadBase(base));
        }
        if breakpoints.is_empty() {
            return Err(EncodingError::Empty);
        }
        for (index, bp) in breakpoints.iter().enumerate() {
            if !(bp.metric.is_finite() && bp.metric >= 0.0) {
                return Err(EncodingError::BadMetric { index });
            }
            if index > 0 && bp.metric <= breakpoints[index - 1].metric {
                return Err(EncodingError::NotIncreasing { index });
            }
        }
        Ok(Self {
            property: property.into(),
            base,
            opacity,
            breakpoints,
        })
    }

    /// The fixed trips encoding: five breakpoints from 17 to 6249 trips.
    pub fn trips() -> Result<Self, EncodingError> {
        let breakpoints = TRIPS_STOPS
            .iter()
            .map(|&(metric, height, hex)| -> Result<Breakpoint, EncodingError> {
                Ok(Breakpoint::new(metric, height, Rgba::from_hex(hex)?))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(
            TRIPS_PROPERTY,
            TRIPS_EXPONENTIAL_BASE,
            TRIPS_OPACITY,
            breakpoints,
        )
    }

    /// Uniform opacity, independent of the metric.
    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    pub fn height_at(&self, metric: f64) -> f64 {
        match self.segment(metric) {
            Segment::At(i) => self.breakpoints[i].height,
            Segment::Between { lower, weight } => {
                let a = self.breakpoints[lower].height;
                let b = self.breakpoints[lower + 1].height;
                a + (b - a) * weight
            }
        }
    }

    pub fn color_at(&self, metric: f64) -> Rgba {
        match self.segment(metric) {
            Segment::At(i) => self.breakpoints[i].color,
            Segment::Between { lower, weight } => {
                let a = self.breakpoints[lower].color;
                a.mix(&self.breakpoints[lower + 1].color, weight)
            }
        }
    }

    fn segment(&self, metric: f64) -> Segment {
        let last = self.breakpoints.len() - 1;
        // NaN compares false everywhere; pin it to the first stop.
        if metric.is_nan() || metric <= self.breakpoints[0].metric {
            return Segment::At(0);
        }
        if metric >= self.breakpoints[last].metric {
            return Segment::At(last);
        }

        // First breakpoint strictly above the metric; the one before it is the lower knot.
        let upper = self.breakpoints.partition_point(|bp| bp.metric <= metric);
        let lower = upper - 1;
        let lo = self.breakpoints[lower].metric;
        if metric == lo {
            return Segment::At(lower);
        }
        let t = (metric - lo) / (self.breakpoints[upper].metric - lo);
        Segment::Between {
            lower,
            weight: exponential_weight(self.base, t),
        }
    }

    /// `["interpolate", ["exponential", base], ["get", property], m0, h0, ...]`
    pub fn height_expression(&self) -> Value {
        self.expression(|bp| number(bp.height))
    }

    /// Same as [`Self::height_expression`] with `#rrggbb` stops.
    pub fn color_expression(&self) -> Value {
        self.expression(|bp| Value::String(bp.color.to_hex()))
    }

    fn expression(&self, output: impl Fn(&Breakpoint) -> Value) -> Value {
        let mut expr = vec![
            json!("interpolate"),
            json!(["exponential", self.base]),
            json!(["get", self.property]),
        ];
        for bp in &self.breakpoints {
            expr.push(number(bp.metric));
            expr.push(output(bp));
        }
        Value::Array(expr)
    }
}

// Whole numbers are emitted as JSON integers so stops read `17`, not `17.0`.
fn number(v: f64) -> Value {
    if v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
        Value::from(v as i64)
    } else {
        Value::from(v)
    }
}
