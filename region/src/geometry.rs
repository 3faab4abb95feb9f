//! Geometry presets for `region` styles.
//!
//! Presets only fix the positional arguments of the `region` command.
//! Arguments are [`Value`]s, so `"${r}"`-style placeholders are accepted and
//! resolved when the object renders.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use regionkit_template::Value;

/// The kind of a registry entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// `block`
    Block,
    /// `cone`
    Cone,
    /// `cylinder`
    Cylinder,
    /// `ellipsoid`
    Ellipsoid,
    /// `plane`
    Plane,
    /// `prism`
    Prism,
    /// `sphere`
    Sphere,
    /// Boolean union of other regions.
    Union,
    /// Boolean intersection of other regions.
    Intersect,
    /// An adopted composite.
    Eval,
    /// A group of detached objects.
    Collection,
}

impl Kind {
    /// Returns the identifier used in default names and in `region` styles.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Block => "block",
            Self::Cone => "cone",
            Self::Cylinder => "cylinder",
            Self::Ellipsoid => "ellipsoid",
            Self::Plane => "plane",
            Self::Prism => "prism",
            Self::Sphere => "sphere",
            Self::Union => "union",
            Self::Intersect => "intersect",
            Self::Eval => "eval",
            Self::Collection => "collection",
        }
    }

    /// Prefix of generated names, e.g. `sphere` in `sphere001`.
    #[must_use]
    pub const fn name_prefix(self) -> &'static str {
        match self {
            Self::Collection => "collect",
            other => other.as_str(),
        }
    }

    /// Similarity tag of fresh objects of this kind.
    #[must_use]
    pub const fn alike(self) -> Alike {
        match self {
            Self::Block => Alike::Block,
            Self::Cone => Alike::Cone,
            Self::Cylinder => Alike::Cylinder,
            Self::Ellipsoid | Self::Sphere => Alike::Ellipsoid,
            Self::Plane => Alike::Plane,
            Self::Prism => Alike::Prism,
            Self::Union | Self::Intersect => Alike::Operator,
            Self::Eval => Alike::Eval,
            Self::Collection => Alike::Composite,
        }
    }
}

/// Similarity tag: which objects look alike when drawn or copied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alike {
    /// Boxes.
    Block,
    /// Cones.
    Cone,
    /// Cylinders.
    Cylinder,
    /// Spheres and ellipsoids.
    Ellipsoid,
    /// Planes.
    Plane,
    /// Prisms.
    Prism,
    /// Unions and intersections.
    Operator,
    /// Adopted expressions.
    Eval,
    /// Merged, piped or grouped objects; never copied.
    Composite,
}

impl Alike {
    /// Returns the tag name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Block => "block",
            Self::Cone => "cone",
            Self::Cylinder => "cylinder",
            Self::Ellipsoid => "ellipsoid",
            Self::Plane => "plane",
            Self::Prism => "prism",
            Self::Operator => "operator",
            Self::Eval => "eval",
            Self::Composite => "composite",
        }
    }
}

/// Axis of a cone or cylinder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Along x.
    X,
    /// Along y.
    Y,
    /// Along z.
    Z,
}

impl Axis {
    /// Returns `x`, `y` or `z`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
        }
    }
}

/// Positional arguments of a primitive region style.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// `xlo xhi ylo yhi zlo zhi`
    Block([Value; 6]),
    /// `dim c1 c2 radlo radhi lo hi`
    Cone {
        /// Cone axis.
        axis: Axis,
        /// `c1 c2 radlo radhi lo hi`
        args: [Value; 6],
    },
    /// `dim c1 c2 radius lo hi`
    Cylinder {
        /// Cylinder axis.
        axis: Axis,
        /// `c1 c2 radius lo hi`
        args: [Value; 5],
    },
    /// `x y z a b c`
    Ellipsoid([Value; 6]),
    /// `px py pz nx ny nz`
    Plane([Value; 6]),
    /// `xlo xhi ylo yhi zlo zhi xy xz yz`
    Prism([Value; 9]),
    /// `x y z radius`
    Sphere([Value; 4]),
}

impl Geometry {
    /// Axis-aligned box.
    #[must_use]
    pub fn block(
        xlo: impl Into<Value>,
        xhi: impl Into<Value>,
        ylo: impl Into<Value>,
        yhi: impl Into<Value>,
        zlo: impl Into<Value>,
        zhi: impl Into<Value>,
    ) -> Self {
        Self::Block([xlo.into(), xhi.into(), ylo.into(), yhi.into(), zlo.into(), zhi.into()])
    }

    /// Truncated cone along `axis`, centred at `(c1, c2)` in the other two
    /// coordinates.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn cone(
        axis: Axis,
        c1: impl Into<Value>,
        c2: impl Into<Value>,
        radlo: impl Into<Value>,
        radhi: impl Into<Value>,
        lo: impl Into<Value>,
        hi: impl Into<Value>,
    ) -> Self {
        Self::Cone {
            axis,
            args: [c1.into(), c2.into(), radlo.into(), radhi.into(), lo.into(), hi.into()],
        }
    }

    /// Cylinder along `axis`.
    #[must_use]
    pub fn cylinder(
        axis: Axis,
        c1: impl Into<Value>,
        c2: impl Into<Value>,
        radius: impl Into<Value>,
        lo: impl Into<Value>,
        hi: impl Into<Value>,
    ) -> Self {
        Self::Cylinder {
            axis,
            args: [c1.into(), c2.into(), radius.into(), lo.into(), hi.into()],
        }
    }

    /// Ellipsoid with semi-axes `a b c`.
    #[must_use]
    pub fn ellipsoid(
        x: impl Into<Value>,
        y: impl Into<Value>,
        z: impl Into<Value>,
        a: impl Into<Value>,
        b: impl Into<Value>,
        c: impl Into<Value>,
    ) -> Self {
        Self::Ellipsoid([x.into(), y.into(), z.into(), a.into(), b.into(), c.into()])
    }

    /// Plane through a point with a normal.
    #[must_use]
    pub fn plane(
        px: impl Into<Value>,
        py: impl Into<Value>,
        pz: impl Into<Value>,
        nx: impl Into<Value>,
        ny: impl Into<Value>,
        nz: impl Into<Value>,
    ) -> Self {
        Self::Plane([px.into(), py.into(), pz.into(), nx.into(), ny.into(), nz.into()])
    }

    /// Parallelepiped; bounds followed by tilt factors `xy xz yz`.
    #[must_use]
    pub fn prism(bounds: [f64; 6], tilts: [f64; 3]) -> Self {
        let [xlo, xhi, ylo, yhi, zlo, zhi] = bounds.map(Value::Float);
        let [xy, xz, yz] = tilts.map(Value::Float);
        Self::Prism([xlo, xhi, ylo, yhi, zlo, zhi, xy, xz, yz])
    }

    /// Sphere.
    #[must_use]
    pub fn sphere(
        x: impl Into<Value>,
        y: impl Into<Value>,
        z: impl Into<Value>,
        radius: impl Into<Value>,
    ) -> Self {
        Self::Sphere([x.into(), y.into(), z.into(), radius.into()])
    }

    /// The registry kind of this preset.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        match self {
            Self::Block(_) => Kind::Block,
            Self::Cone { .. } => Kind::Cone,
            Self::Cylinder { .. } => Kind::Cylinder,
            Self::Ellipsoid(_) => Kind::Ellipsoid,
            Self::Plane(_) => Kind::Plane,
            Self::Prism(_) => Kind::Prism,
            Self::Sphere(_) => Kind::Sphere,
        }
    }

    /// Positional arguments as emitted after the style.
    #[must_use]
    pub fn args(&self) -> Vec<Value> {
        match self {
            Self::Block(a) | Self::Ellipsoid(a) | Self::Plane(a) => a.to_vec(),
            Self::Prism(a) => a.to_vec(),
            Self::Sphere(a) => a.to_vec(),
            Self::Cone { axis, args } => std::iter::once(Value::verbatim(axis.as_str()))
                .chain(args.iter().cloned())
                .collect(),
            Self::Cylinder { axis, args } => std::iter::once(Value::verbatim(axis.as_str()))
                .chain(args.iter().cloned())
                .collect(),
        }
    }

    /// Enclosed volume in coordinate units, when every argument is numeric.
    #[must_use]
    pub fn volume(&self) -> Option<f64> {
        match self {
            Self::Block(a) => extents(&a[..6]),
            Self::Prism(a) => extents(&a[..6]),
            Self::Sphere(a) => {
                let r = a[3].as_f64()?;
                Some(4.0 / 3.0 * PI * r.powi(3))
            }
            Self::Ellipsoid(a) => {
                let (x, y, z) = (a[3].as_f64()?, a[4].as_f64()?, a[5].as_f64()?);
                Some(4.0 / 3.0 * PI * x * y * z)
            }
            Self::Cylinder { args, .. } => {
                let r = args[2].as_f64()?;
                let h = (args[4].as_f64()? - args[3].as_f64()?).abs();
                Some(PI * r * r * h)
            }
            Self::Cone { args, .. } => {
                let (r1, r2) = (args[2].as_f64()?, args[3].as_f64()?);
                let h = (args[5].as_f64()? - args[4].as_f64()?).abs();
                Some(PI * h * (r1 * r1 + r1 * r2 + r2 * r2) / 3.0)
            }
            Self::Plane(_) => None,
        }
    }
}

fn extents(bounds: &[Value]) -> Option<f64> {
    let mut volume = 1.0;
    for pair in bounds.chunks(2) {
        let lo = pair.first()?.as_f64()?;
        let hi = pair.get(1)?.as_f64()?;
        volume *= (hi - lo).abs();
    }
    Some(volume)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9 * b.abs().max(1.0)
    }

    #[test]
    fn kinds_and_names() {
        assert_eq!(Geometry::sphere(0, 0, 0, 1).kind(), Kind::Sphere);
        assert_eq!(Kind::Sphere.alike(), Alike::Ellipsoid);
        assert_eq!(Kind::Collection.name_prefix(), "collect");
        assert_eq!(Kind::Union.alike(), Alike::Operator);
    }

    #[test]
    fn args_include_axis() {
        let c = Geometry::cylinder(Axis::Z, 0, 0, 2, -1, 1);
        let text: Vec<String> = c.args().iter().map(ToString::to_string).collect();
        assert_eq!(text, vec!["z", "0", "0", "2", "-1", "1"]);
    }

    #[test]
    fn volumes() {
        assert!(close(Geometry::block(-5, 5, -5, 5, -5, 5).volume().unwrap(), 1000.0));
        assert!(close(Geometry::sphere(0, 0, 0, 3).volume().unwrap(), 36.0 * PI));
        assert!(close(Geometry::cylinder(Axis::X, 0, 0, 2, 0, 3).volume().unwrap(), 12.0 * PI));
        assert!(close(
            Geometry::cone(Axis::Z, 0, 0, 1, 2, 0, 3).volume().unwrap(),
            7.0 * PI
        ));
        assert!(close(Geometry::ellipsoid(0, 0, 0, 1, 2, 3).volume().unwrap(), 8.0 * PI));
        assert!(close(
            Geometry::prism([0.0, 2.0, 0.0, 3.0, 0.0, 4.0], [0.5, 0.0, 0.0]).volume().unwrap(),
            24.0
        ));
        assert_eq!(Geometry::plane(0, 0, 0, 0, 0, 1).volume(), None);
    }

    #[test]
    fn placeholder_args_have_no_volume() {
        assert_eq!(Geometry::sphere(0, 0, 0, "${r}").volume(), None);
    }
}
