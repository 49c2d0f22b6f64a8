use rayfan::*;
use std::{fs::File, io::BufReader, path::Path};

pub use serde_json;

use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("missing field `{0}`")]
    Missing(&'static str),
    #[error("invalid field `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
    #[error("invalid mirror at index {index}: {source}")]
    Mirror {
        index: usize,
        #[source]
        source: Box<SceneError>,
    },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SceneError {
    #[inline]
    fn invalid(field: &'static str, reason: &'static str) -> Self {
        Self::Invalid { field, reason }
    }
}

pub type Result<T, E = SceneError> = core::result::Result<T, E>;

/// Parses a JSON array of exactly 2 numbers into a vector.
pub fn json_array_to_vector(json: &Value) -> Option<Vector> {
    let [x, y] = json.as_array()?.as_slice() else {
        return None;
    };

    Some(Vector::new(x.as_f64()?, y.as_f64()?))
}

/// Reads `json[field]` as a vector, `None` if the field is absent.
fn opt_vector(json: &Value, field: &'static str) -> Result<Option<Vector>> {
    json.get(field)
        .map(|value| {
            json_array_to_vector(value)
                .ok_or_else(|| SceneError::invalid(field, "expected an array of 2 numbers"))
        })
        .transpose()
}

fn vector(json: &Value, field: &'static str) -> Result<Vector> {
    opt_vector(json, field)?.ok_or(SceneError::Missing(field))
}

/// Reads `json[field]` as a number, `None` if the field is absent.
fn opt_float(json: &Value, field: &'static str) -> Result<Option<Float>> {
    json.get(field)
        .map(|value| {
            value
                .as_f64()
                .ok_or_else(|| SceneError::invalid(field, "expected a number"))
        })
        .transpose()
}

pub trait JsonSer {
    /// Serialize `self` into a JSON object.
    fn to_json(&self) -> Value;
}

pub trait JsonDes {
    /// Deserialize from a JSON object.
    ///
    /// Returns an error if `json`'s format or values are invalid.
    fn from_json(json: &Value) -> Result<Self>
    where
        Self: Sized;
}

impl<T: JsonSer> JsonSer for [T] {
    fn to_json(&self) -> Value {
        Value::Array(self.iter().map(T::to_json).collect())
    }
}

impl<T: JsonSer> JsonSer for Vec<T> {
    fn to_json(&self) -> Value {
        self.as_slice().to_json()
    }
}

impl<T: JsonSer + ?Sized> JsonSer for &T {
    fn to_json(&self) -> Value {
        (**self).to_json()
    }
}

impl JsonSer for Segment {
    fn to_json(&self) -> Value {
        serde_json::json!({
            "p1": self.p1().as_slice(),
            "p2": self.p2().as_slice(),
        })
    }
}

impl JsonDes for Segment {
    /// Deserialize a new mirror from a JSON object.
    ///
    /// The JSON object must follow the following format:
    ///
    /// ```json
    /// {
    ///     "p1": [600, 150],
    ///     "p2": [700, 300]
    /// }
    /// ```
    ///
    /// Coincident endpoints are accepted, the resulting mirror is never hit.
    fn from_json(json: &Value) -> Result<Self> {
        Ok(Self::new(vector(json, "p1")?, vector(json, "p2")?))
    }
}

impl JsonSer for Viewport {
    fn to_json(&self) -> Value {
        serde_json::json!({
            "width": self.width,
            "height": self.height,
        })
    }
}

impl JsonDes for Viewport {
    /// Both fields are optional and default to those of [`Viewport::default`]
    fn from_json(json: &Value) -> Result<Self> {
        let default = Self::default();

        let viewport = Self {
            width: opt_float(json, "width")?.unwrap_or(default.width),
            height: opt_float(json, "height")?.unwrap_or(default.height),
        };

        if !(viewport.width > 0. && viewport.width.is_finite()) {
            return Err(SceneError::invalid("width", "must be positive"));
        }

        if !(viewport.height > 0. && viewport.height.is_finite()) {
            return Err(SceneError::invalid("height", "must be positive"));
        }

        Ok(viewport)
    }
}

impl JsonSer for FanParams {
    fn to_json(&self) -> Value {
        serde_json::json!({
            "ray_count": self.ray_count,
            "span_degrees": self.span_degrees,
        })
    }
}

impl JsonDes for FanParams {
    /// Both fields are optional and default to those of [`FanParams::default`]
    fn from_json(json: &Value) -> Result<Self> {
        let default = Self::default();

        let ray_count = json
            .get("ray_count")
            .map(|value| {
                value
                    .as_u64()
                    .and_then(|n| usize::try_from(n).ok())
                    .ok_or_else(|| {
                        SceneError::invalid("ray_count", "expected a non-negative integer")
                    })
            })
            .transpose()?
            .unwrap_or(default.ray_count);

        if ray_count > Self::MAX_RAY_COUNT {
            return Err(SceneError::invalid("ray_count", "must be at most 65536"));
        }

        let span_degrees = opt_float(json, "span_degrees")?.unwrap_or(default.span_degrees);

        if !span_degrees.is_finite() {
            return Err(SceneError::invalid("span_degrees", "must be finite"));
        }

        Ok(Self::new(ray_count, span_degrees))
    }
}

impl JsonSer for DrawParams {
    fn to_json(&self) -> Value {
        serde_json::json!({
            "reflected_length": self.reflected_length,
            "escape_length": self.escape_length,
            "marker_radius": self.marker_radius,
            "mirror_thickness": self.mirror_thickness,
        })
    }
}

impl JsonDes for DrawParams {
    /// All fields are optional and default to those of [`DrawParams::default`]
    fn from_json(json: &Value) -> Result<Self> {
        let default = Self::default();

        Ok(Self {
            reflected_length: opt_float(json, "reflected_length")?
                .unwrap_or(default.reflected_length),
            escape_length: opt_float(json, "escape_length")?.unwrap_or(default.escape_length),
            marker_radius: opt_float(json, "marker_radius")?.unwrap_or(default.marker_radius),
            mirror_thickness: opt_float(json, "mirror_thickness")?
                .unwrap_or(default.mirror_thickness),
        })
    }
}

impl JsonSer for Emitter {
    fn to_json(&self) -> Value {
        serde_json::json!({
            "pos": self.pos.as_slice(),
            "size": self.size.as_slice(),
            "speed": self.speed,
        })
    }
}

/// Deserializes an emitter placed in `viewport`.
///
/// Missing fields default to those of [`Emitter::left_centered`].
pub fn emitter_from_json(json: &Value, viewport: &Viewport) -> Result<Emitter> {
    let default = Emitter::left_centered(viewport);

    let size = opt_vector(json, "size")?.unwrap_or(default.size);

    if size.iter().any(|c| !(*c >= 0.)) {
        return Err(SceneError::invalid("size", "must not be negative"));
    }

    if size.x > viewport.width || size.y > viewport.height {
        return Err(SceneError::invalid("size", "must fit in the viewport"));
    }

    // re-center with the actual size, unless a position is given
    let pos = opt_vector(json, "pos")?.unwrap_or_else(|| {
        Vector::new(default.pos.x, (viewport.height - size.y) * 0.5)
    });

    let speed = opt_float(json, "speed")?.unwrap_or(default.speed);

    if !(speed >= 0. && speed.is_finite()) {
        return Err(SceneError::invalid("speed", "must be a non-negative number"));
    }

    Ok(Emitter::new(pos, size, speed))
}

impl JsonSer for Scene {
    /// Serialize a scene into a JSON object.
    ///
    /// The format of the returned object is explained in [`Self::from_json`]
    fn to_json(&self) -> Value {
        serde_json::json!({
            "title": self.title,
            "viewport": self.viewport.to_json(),
            "emitter": self.emitter.to_json(),
            "fan": self.fan.to_json(),
            "draw": self.draw.to_json(),
            "mirrors": self.mirrors.to_json(),
        })
    }
}

impl JsonDes for Scene {
    /// Deserialize a new scene from a JSON object.
    ///
    /// The JSON object must follow the following format:
    ///
    /// ```json
    /// {
    ///     "title": "Lift + Multi-Mirror Ray Reflection",
    ///     "viewport": { "width": 800, "height": 600 },
    ///     "emitter": { "pos": [100, 275], "size": [50, 50], "speed": 300 },
    ///     "fan": { "ray_count": 10, "span_degrees": 90 },
    ///     "draw": { "reflected_length": 300, "escape_length": 800 },
    ///     "mirrors": [
    ///         { "p1": [600, 150], "p2": [700, 300] },
    ///         { "p1": [600, 450], "p2": [700, 350] }
    ///     ]
    /// }
    /// ```
    ///
    /// Only `mirrors` is required, everything else falls back to the
    /// same defaults as [`Scene::new`].
    fn from_json(json: &Value) -> Result<Self> {
        let mirrors = json
            .get("mirrors")
            .ok_or(SceneError::Missing("mirrors"))?
            .as_array()
            .ok_or_else(|| SceneError::invalid("mirrors", "expected an array"))?
            .iter()
            .enumerate()
            .map(|(index, value)| {
                Segment::from_json(value).map_err(|e| SceneError::Mirror {
                    index,
                    source: Box::new(e),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let title = match json.get("title") {
            Some(title) => title
                .as_str()
                .ok_or_else(|| SceneError::invalid("title", "expected a string"))?
                .to_owned(),
            None => Scene::default().title,
        };

        let fan = json
            .get("fan")
            .map(FanParams::from_json)
            .transpose()?
            .unwrap_or_default();

        let mut scene = Scene::new(title, mirrors, fan);

        if let Some(viewport) = json.get("viewport") {
            scene.viewport = Viewport::from_json(viewport)?;
        }

        scene.emitter = emitter_from_json(
            json.get("emitter").unwrap_or(&Value::Null),
            &scene.viewport,
        )?;

        if let Some(draw) = json.get("draw") {
            scene.draw = DrawParams::from_json(draw)?;
        }

        Ok(scene)
    }
}

/// Reads a scene from the JSON file at `path`.
pub fn load_scene(path: impl AsRef<Path>) -> Result<Scene> {
    let path = path.as_ref();
    let json: Value = serde_json::from_reader(BufReader::new(File::open(path)?))?;
    let scene = Scene::from_json(&json)?;

    log::info!(
        "loaded scene {:?} from {}: {} mirror(s), {} ray(s) over {}°",
        scene.title,
        path.display(),
        scene.mirrors.len(),
        scene.fan.ray_count,
        scene.fan.span_degrees,
    );

    Ok(scene)
}

/// Writes `scene` as pretty-printed JSON to `path`, overwriting it.
pub fn save_scene(path: impl AsRef<Path>, scene: &Scene) -> Result<()> {
    serde_json::to_writer_pretty(File::create(path)?, &scene.to_json())?;
    Ok(())
}
