//! RGB color spaces defined by a whitepoint and three primary chromaticities,
//! and the matrices that take linear RGB to CIE XYZ and between spaces.
//!
//! Derivation follows the usual normalized primary matrix construction:
//!
//!   <http://www.brucelindbloom.com/index.html?Eqn_RGB_XYZ_Matrix.html>
//!
//! No chromatic adaptation is performed. Composing two spaces only makes
//! sense when both share a whitepoint.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::error::{ColorError, ColorResult};
use crate::matrix::Matrix3;
use crate::types::{XY, XYZ};

/// Standard illuminant chromaticities
#[derive(Copy, Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Illuminant {
    #[serde(alias = "D50")]
    D50,
    #[serde(alias = "D65")]
    D65,
    #[serde(alias = "DCI", alias = "Dci")]
    Dci,
    #[serde(alias = "E")]
    E,
}

impl Illuminant {
    #[must_use]
    pub fn xy(self) -> XY {
        match self {
            // 4-digit values from ITU-R BT.709 / IEC 61966-2-1
            Self::D65 => XY::new(0.3127, 0.3290),
            Self::D50 => XY::new(0.3457, 0.3585),
            Self::Dci => XY::new(0.314, 0.351),
            Self::E => XY::new(1.0 / 3.0, 1.0 / 3.0),
        }
    }
}

/// Tristimulus value of a standard illuminant, normalized to Y = 1
pub fn whitepoint_xyz(illuminant: Illuminant) -> ColorResult<XYZ> {
    illuminant.xy().to_xyz()
}

/// Builds the matrix taking linear RGB to XYZ, such that RGB (1, 1, 1)
/// maps onto `white`.
pub fn rgb_to_xyz_matrix(white: XYZ, red: XY, green: XY, blue: XY) -> ColorResult<Matrix3> {
    let unscaled = Matrix3::from_columns([
        red.to_xyz()?.into(),
        green.to_xyz()?.into(),
        blue.to_xyz()?.into(),
    ]);

    let scale = unscaled.try_inverted("primaries are collinear")? * <[f64; 3]>::from(white);

    log::trace!("Primary scale factors: {scale:?}");

    Ok(unscaled.scale_columns(scale))
}

/// Forward and inverse conversion between two RGB spaces
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub forward: Matrix3,
    pub inverse: Matrix3,
}

/// Composes `source` RGB -> XYZ with XYZ -> `dest` RGB.
///
/// Both matrices must be referenced to the same whitepoint; mismatched
/// whitepoints give a result without any error.
pub fn compose_transform(source_to_xyz: &Matrix3, dest_to_xyz: &Matrix3) -> ColorResult<Transform> {
    if source_to_xyz.is_singular() {
        return Err(ColorError::SingularMatrix(
            "source RGB to XYZ matrix".to_string(),
        ));
    }
    let xyz_to_dest = dest_to_xyz.try_inverted("destination RGB to XYZ matrix")?;

    let forward = xyz_to_dest * *source_to_xyz;
    let inverse = forward.try_inverted("composed transform")?;

    Ok(Transform { forward, inverse })
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorSpace {
    pub name: String,
    pub white: XY,
    pub red: XY,
    pub green: XY,
    pub blue: XY,
}

impl ColorSpace {
    #[must_use]
    pub fn new(name: &str, white: XY, red: XY, green: XY, blue: XY) -> Self {
        Self {
            name: name.to_string(),
            white,
            red,
            green,
            blue,
        }
    }

    #[must_use]
    pub fn srgb() -> Self {
        Self::new(
            "sRGB",
            Illuminant::D65.xy(),
            XY::new(0.640, 0.330),
            XY::new(0.300, 0.600),
            XY::new(0.150, 0.060),
        )
    }

    #[must_use]
    pub fn rec709() -> Self {
        Self {
            name: "Rec.709".to_string(),
            ..Self::srgb()
        }
    }

    #[must_use]
    pub fn rec2020() -> Self {
        Self::new(
            "Rec.2020",
            Illuminant::D65.xy(),
            XY::new(0.708, 0.292),
            XY::new(0.170, 0.797),
            XY::new(0.131, 0.046),
        )
    }

    #[must_use]
    pub fn display_p3() -> Self {
        Self::new(
            "Display P3",
            Illuminant::D65.xy(),
            XY::new(0.680, 0.320),
            XY::new(0.265, 0.690),
            XY::new(0.150, 0.060),
        )
    }

    #[must_use]
    pub fn dci_p3() -> Self {
        Self {
            name: "DCI-P3".to_string(),
            white: Illuminant::Dci.xy(),
            ..Self::display_p3()
        }
    }

    #[must_use]
    pub fn adobe_rgb() -> Self {
        Self::new(
            "Adobe RGB (1998)",
            Illuminant::D65.xy(),
            XY::new(0.640, 0.330),
            XY::new(0.210, 0.710),
            XY::new(0.150, 0.060),
        )
    }

    /// Checks every chromaticity up front, so failures name the offending
    /// point instead of surfacing halfway through a derivation.
    pub fn validate(&self) -> ColorResult<()> {
        self.white.check(&format!("{} whitepoint", self.name))?;
        self.red.check(&format!("{} red primary", self.name))?;
        self.green.check(&format!("{} green primary", self.name))?;
        self.blue.check(&format!("{} blue primary", self.name))?;

        let unscaled = Matrix3::from_columns([
            self.red.to_xyz()?.into(),
            self.green.to_xyz()?.into(),
            self.blue.to_xyz()?.into(),
        ]);
        unscaled.try_inverted(&format!("{} primaries are collinear", self.name))?;

        Ok(())
    }

    pub fn white_xyz(&self) -> ColorResult<XYZ> {
        self.white.to_xyz()
    }

    pub fn rgb_to_xyz(&self) -> ColorResult<Matrix3> {
        self.validate()?;
        log::debug!("Deriving RGB to XYZ matrix for [{}]", self.name);
        rgb_to_xyz_matrix(self.white_xyz()?, self.red, self.green, self.blue)
    }

    pub fn xyz_to_rgb(&self) -> ColorResult<Matrix3> {
        self.rgb_to_xyz()?
            .try_inverted(&format!("{} RGB to XYZ matrix", self.name))
    }

    /// Relative luminance weights of the R, G and B channels
    pub fn luminance_coefficients(&self) -> ColorResult<[f64; 3]> {
        Ok(self.rgb_to_xyz()?.row(1))
    }

    #[must_use]
    pub fn same_whitepoint(&self, other: &Self) -> bool {
        (self.white.x - other.white.x).abs() < 1e-9 && (self.white.y - other.white.y).abs() < 1e-9
    }

    /// Transform taking linear RGB in `self` to linear RGB in `dest`
    pub fn transform_to(&self, dest: &Self) -> ColorResult<Transform> {
        if !self.same_whitepoint(dest) {
            log::warn!(
                "Whitepoints differ: [{}] {} vs [{}] {}. No chromatic adaptation is applied.",
                self.name,
                self.white,
                dest.name,
                dest.white
            );
        }

        compose_transform(&self.rgb_to_xyz()?, &dest.rgb_to_xyz()?)
    }
}

impl Display for ColorSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: white {} red {} green {} blue {}",
            self.name, self.white, self.red, self.green, self.blue
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn d65() -> XYZ {
        whitepoint_xyz(Illuminant::D65).unwrap()
    }

    #[test]
    fn test_d65_tristimulus() {
        let white = d65();
        assert!((white.x - 0.9505).abs() < 1e-3);
        assert_eq!(white.y, 1.0);
        assert!((white.z - 1.0888).abs() < 1e-3);
    }

    #[test]
    fn test_illuminant_names() {
        for (name, illuminant) in [
            ("d65", Illuminant::D65),
            ("D65", Illuminant::D65),
            ("D50", Illuminant::D50),
            ("DCI", Illuminant::Dci),
            ("dci", Illuminant::Dci),
            ("E", Illuminant::E),
        ] {
            let parsed: Illuminant = serde_yaml::from_str(name).unwrap();
            assert_eq!(parsed, illuminant, "{name}");
        }
        assert!(serde_yaml::from_str::<Illuminant>("D75").is_err());
    }

    #[test]
    fn test_srgb_matrix() {
        let m = rgb_to_xyz_matrix(
            d65(),
            XY::new(0.640, 0.330),
            XY::new(0.300, 0.600),
            XY::new(0.150, 0.060),
        )
        .unwrap();

        let expected = Matrix3::from_rows([
            [0.4124, 0.3576, 0.1805],
            [0.2126, 0.7152, 0.0722],
            [0.0193, 0.1192, 0.9505],
        ]);
        assert!(m.approx_eq(&expected, 1e-3), "{m:?}");
    }

    #[test]
    fn test_white_reproduction() {
        for space in [
            ColorSpace::srgb(),
            ColorSpace::rec2020(),
            ColorSpace::display_p3(),
            ColorSpace::dci_p3(),
            ColorSpace::adobe_rgb(),
        ] {
            let white: [f64; 3] = space.white_xyz().unwrap().into();
            let got = space.rgb_to_xyz().unwrap() * [1.0, 1.0, 1.0];
            for (a, b) in got.iter().zip(white) {
                assert!((a - b).abs() < TOLERANCE, "{}: {got:?}", space.name);
            }
        }

        let got = ColorSpace::srgb().rgb_to_xyz().unwrap() * [1.0, 1.0, 1.0];
        assert!((got[0] - 0.9505).abs() < 1e-3);
        assert!((got[1] - 1.0).abs() < 1e-3);
        assert!((got[2] - 1.0888).abs() < 1e-3);
    }

    #[test]
    fn test_rgb_xyz_roundtrip() {
        let space = ColorSpace::rec2020();
        let to_xyz = space.rgb_to_xyz().unwrap();
        let to_rgb = space.xyz_to_rgb().unwrap();

        for v in [
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.2, 0.5, 0.9],
            [-0.3, 1.7, 0.01],
        ] {
            let back = to_rgb * (to_xyz * v);
            for (a, b) in back.iter().zip(v) {
                assert!((a - b).abs() < TOLERANCE, "{v:?} -> {back:?}");
            }
        }
    }

    #[test]
    fn test_luminance_coefficients() {
        let [r, g, b] = ColorSpace::srgb().luminance_coefficients().unwrap();
        assert!((r - 0.2126).abs() < 1e-4);
        assert!((g - 0.7152).abs() < 1e-4);
        assert!((b - 0.0722).abs() < 1e-4);
        assert!((r + g + b - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_compose_identity() {
        let m = ColorSpace::display_p3().rgb_to_xyz().unwrap();
        let t = compose_transform(&m, &m).unwrap();
        assert!(t.forward.approx_eq(&Matrix3::IDENTITY, TOLERANCE));
        assert!(t.inverse.approx_eq(&Matrix3::IDENTITY, TOLERANCE));
    }

    #[test]
    fn test_compose_inverse_law() {
        let t = ColorSpace::rec709()
            .transform_to(&ColorSpace::rec2020())
            .unwrap();
        assert!((t.forward * t.inverse).approx_eq(&Matrix3::IDENTITY, TOLERANCE));
        assert!((t.inverse * t.forward).approx_eq(&Matrix3::IDENTITY, TOLERANCE));
    }

    #[test]
    fn test_rec709_to_rec2020() {
        // Values published in ITU-R BT.2087
        let t = ColorSpace::rec709()
            .transform_to(&ColorSpace::rec2020())
            .unwrap();
        let expected = Matrix3::from_rows([
            [0.6274, 0.3293, 0.0433],
            [0.0691, 0.9195, 0.0114],
            [0.0164, 0.0880, 0.8956],
        ]);
        assert!(t.forward.approx_eq(&expected, 1e-3), "{:?}", t.forward);

        // White stays white
        let white = t.forward * [1.0, 1.0, 1.0];
        for c in white {
            assert!((c - 1.0).abs() < TOLERANCE);
        }
    }

    #[test]
    fn test_srgb_equals_rec709() {
        let a = ColorSpace::srgb().rgb_to_xyz().unwrap();
        let b = ColorSpace::rec709().rgb_to_xyz().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_collinear_primaries() {
        let err = rgb_to_xyz_matrix(
            d65(),
            XY::new(0.2, 0.2),
            XY::new(0.3, 0.3),
            XY::new(0.4, 0.4),
        )
        .unwrap_err();
        assert!(matches!(err, ColorError::SingularMatrix(_)));

        let space = ColorSpace::new(
            "flat",
            Illuminant::D65.xy(),
            XY::new(0.2, 0.2),
            XY::new(0.3, 0.3),
            XY::new(0.4, 0.4),
        );
        let err = space.validate().unwrap_err();
        assert!(matches!(err, ColorError::SingularMatrix(_)));
        assert!(err.to_string().contains("flat"));
    }

    #[test]
    fn test_zero_y_primary() {
        let space = ColorSpace {
            green: XY::new(0.3, 0.0),
            ..ColorSpace::srgb()
        };
        let err = space.rgb_to_xyz().unwrap_err();
        assert!(matches!(err, ColorError::InvalidChromaticity { .. }));
        assert!(err.to_string().contains("sRGB green primary"));
    }

    #[test]
    fn test_compose_singular() {
        let flat = Matrix3([[1.0, 1.0, 1.0]; 3]);
        let good = ColorSpace::srgb().rgb_to_xyz().unwrap();
        assert!(matches!(
            compose_transform(&flat, &good),
            Err(ColorError::SingularMatrix(_))
        ));
        assert!(matches!(
            compose_transform(&good, &flat),
            Err(ColorError::SingularMatrix(_))
        ));
    }

    #[test]
    fn test_compose_badly_scaled() {
        let m = Matrix3::from_rows([[1e6, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
        let t = compose_transform(&m, &Matrix3::IDENTITY).unwrap();
        assert!(t.forward.approx_eq(&m, 1e-9));
        assert!((t.forward * t.inverse).approx_eq(&Matrix3::IDENTITY, 1e-9));
    }

    #[test]
    fn test_tiny_blue_y_is_valid() {
        for y in [1e-5, 1e-6, 1e-7] {
            let space = ColorSpace {
                name: "tiny-blue".to_string(),
                blue: XY::new(0.150, y),
                ..ColorSpace::srgb()
            };
            space.validate().unwrap();

            let white: [f64; 3] = space.white_xyz().unwrap().into();
            let got = space.rgb_to_xyz().unwrap() * [1.0, 1.0, 1.0];
            for (a, b) in got.iter().zip(white) {
                assert!((a - b).abs() < 1e-6, "y={y}: {got:?}");
            }
        }
    }

    #[test]
    fn test_mismatched_whitepoint_still_composes() {
        let p3 = ColorSpace::display_p3();
        let dci = ColorSpace::dci_p3();
        assert!(!p3.same_whitepoint(&dci));
        assert!(p3.transform_to(&dci).is_ok());
    }
}
