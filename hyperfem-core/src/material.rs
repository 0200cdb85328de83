//! Material parameters and model selection.
//!
//! A material model is chosen by tag ([`MaterialModel`]) together with a
//! parameter vector `[E, ν]` (plus the stiffening power for SEMMT).
//! Lamé parameters are derived once per assembly call.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Isotropic elastic parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Young's modulus.
    pub youngs_modulus: f64,
    /// Poisson's ratio (dimensionless).
    pub poissons_ratio: f64,
}

impl Material {
    /// Create a material, rejecting physically invalid parameters.
    ///
    /// # Errors
    ///
    /// Returns error unless `E > 0` and `-1 < ν < 0.5`.
    pub fn new(youngs_modulus: f64, poissons_ratio: f64) -> Result<Self> {
        if youngs_modulus <= 0.0 {
            return Err(Error::InvalidMaterial(
                "Young's modulus must be positive".into(),
            ));
        }
        if poissons_ratio <= -1.0 || poissons_ratio >= 0.5 {
            return Err(Error::InvalidMaterial(
                "Poisson's ratio must be in range (-1, 0.5)".into(),
            ));
        }
        Ok(Self::unchecked(youngs_modulus, poissons_ratio))
    }

    /// Create a material without range checks.
    ///
    /// Out-of-range values are passed through: `ν = 0.5` gives an infinite
    /// `λ` and non-finite assembly output.
    pub fn unchecked(youngs_modulus: f64, poissons_ratio: f64) -> Self {
        Self {
            youngs_modulus,
            poissons_ratio,
        }
    }

    /// Shear modulus G = E / (2(1 + ν)).
    pub fn shear_modulus(&self) -> f64 {
        self.youngs_modulus / (2.0 + 2.0 * self.poissons_ratio)
    }

    /// Bulk modulus K = E / (3(1 - 2ν)).
    pub fn bulk_modulus(&self) -> f64 {
        self.youngs_modulus / (3.0 * (1.0 - 2.0 * self.poissons_ratio))
    }

    /// Lamé's first parameter λ = Eν / ((1+ν)(1-2ν)).
    pub fn lame_lambda(&self) -> f64 {
        let e = self.youngs_modulus;
        let nu = self.poissons_ratio;
        e * nu / ((1.0 + nu) * (1.0 - 2.0 * nu))
    }

    /// Lamé's second parameter μ = G (shear modulus).
    pub fn lame_mu(&self) -> f64 {
        self.shear_modulus()
    }

    /// Bulk modulus of the decoupled Neo-Hookean split, κ = ⅔μ + λ.
    pub fn decoupled_bulk_modulus(&self) -> f64 {
        2.0 / 3.0 * self.lame_mu() + self.lame_lambda()
    }
}

/// Material presets.
impl Material {
    /// Structural steel (E = 200 GPa, ν = 0.3).
    pub fn steel() -> Self {
        Self::unchecked(200e9, 0.3)
    }
}

/// Supported constitutive laws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialModel {
    /// Small-strain linear elasticity.
    Linear,
    /// Linear elasticity stiffened by the element volume ratio, used for
    /// mesh motion.
    Semmt,
    /// St. Venant-Kirchhoff.
    StVenantKirchhoff,
    /// Compressible Neo-Hookean.
    NeoHookean,
    /// Neo-Hookean with a volumetric/isochoric split.
    NeoHookean2,
}

impl MaterialModel {
    /// All models, in declaration order.
    pub const ALL: [MaterialModel; 5] = [
        MaterialModel::Linear,
        MaterialModel::Semmt,
        MaterialModel::StVenantKirchhoff,
        MaterialModel::NeoHookean,
        MaterialModel::NeoHookean2,
    ];

    /// Canonical name, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            MaterialModel::Linear => "Linear",
            MaterialModel::Semmt => "SEMMT",
            MaterialModel::StVenantKirchhoff => "StVenantKirchhoff",
            MaterialModel::NeoHookean => "NeoHookean",
            MaterialModel::NeoHookean2 => "NeoHookean2",
        }
    }

    /// Length of the parameter vector this model expects.
    pub fn parameter_count(self) -> usize {
        match self {
            MaterialModel::Semmt => 3,
            _ => 2,
        }
    }

    /// Check `params` against [`Self::parameter_count`] and extract the
    /// elastic constants.
    pub fn material(self, params: &[f64]) -> Result<Material> {
        if params.len() != self.parameter_count() {
            return Err(Error::ParameterCount {
                model: self.name().to_string(),
                expected: self.parameter_count(),
                got: params.len(),
            });
        }
        Ok(Material::unchecked(params[0], params[1]))
    }
}

impl FromStr for MaterialModel {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        MaterialModel::ALL
            .iter()
            .copied()
            .find(|m| m.name() == name)
            .ok_or_else(|| Error::UnknownMaterial(name.to_string()))
    }
}

impl fmt::Display for MaterialModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
