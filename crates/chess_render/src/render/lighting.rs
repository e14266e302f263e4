//! Lighting system
//!
//! Point and spot lights with constant/linear/quadratic falloff, and the
//! [`LightRegistry`] that owns them in a stable order. Registry order is the
//! shader array index and the shadow-map slot: every point light first, then
//! every spot light.
//!
//! Disabled lights keep their slot and still have their full parameter set
//! written each frame with `enabled = false`; the lit stage branches on the
//! flag per fragment, so toggling a light never resizes a uniform array.

use crate::foundation::math::{utils, Vec3};
use crate::render::api::{BackendResult, RenderBackend};
use serde::{Deserialize, Serialize};

/// Distance falloff terms: `1 / (constant + linear·d + quadratic·d²)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Attenuation {
    /// Constant term
    pub constant: f32,
    /// Linear term
    pub linear: f32,
    /// Quadratic term
    pub quadratic: f32,
}

impl Attenuation {
    /// Attenuation factor at distance `d`
    pub fn factor(&self, d: f32) -> f32 {
        1.0 / (self.constant + self.linear * d + self.quadratic * d * d)
    }
}

impl Default for Attenuation {
    fn default() -> Self {
        Self {
            constant: 1.0,
            linear: 0.09,
            quadratic: 0.032,
        }
    }
}

/// Omnidirectional light
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointLight {
    /// World-space position
    pub position: Vec3,
    /// Ambient color
    pub ambient: Vec3,
    /// Diffuse color, also the marker tint
    pub diffuse: Vec3,
    /// Specular color
    pub specular: Vec3,
    /// Distance falloff
    pub attenuation: Attenuation,
    /// Whether the light contributes and casts shadows
    pub enabled: bool,
}

impl PointLight {
    /// Create an enabled light at `position` with default colors
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Set ambient, diffuse and specular intensity as grey levels
    #[must_use]
    pub fn with_intensities(mut self, ambient: f32, diffuse: f32, specular: f32) -> Self {
        self.ambient = Vec3::repeat(ambient);
        self.diffuse = Vec3::repeat(diffuse);
        self.specular = Vec3::repeat(specular);
        self
    }

    /// Diffuse contribution scale at `fragment` (attenuation only)
    pub fn intensity_at(&self, fragment: Vec3) -> f32 {
        if !self.enabled {
            return 0.0;
        }
        self.attenuation.factor((self.position - fragment).norm())
    }
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 4.0),
            ambient: Vec3::repeat(0.2),
            diffuse: Vec3::repeat(1.6),
            specular: Vec3::repeat(1.0),
            attenuation: Attenuation::default(),
            enabled: true,
        }
    }
}

/// Cone light with a soft edge between `cut_off` and `outer_cut_off`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpotLight {
    /// World-space position
    pub position: Vec3,
    /// Normalized cone axis
    pub direction: Vec3,
    /// Cosine of the inner (full intensity) half-angle
    pub cut_off: f32,
    /// Cosine of the outer (zero intensity) half-angle
    pub outer_cut_off: f32,
    /// Ambient color
    pub ambient: Vec3,
    /// Diffuse color, also the marker tint
    pub diffuse: Vec3,
    /// Specular color
    pub specular: Vec3,
    /// Distance falloff
    pub attenuation: Attenuation,
    /// Whether the light contributes and casts shadows
    pub enabled: bool,
}

impl SpotLight {
    /// Create an enabled spot light aimed along `direction`
    pub fn aimed(position: Vec3, direction: Vec3) -> Self {
        Self {
            position,
            direction: direction.normalize(),
            ..Self::default()
        }
    }

    /// Set the cone half-angles in degrees; stored as cosines
    #[must_use]
    pub fn with_cone_degrees(mut self, inner: f32, outer: f32) -> Self {
        self.cut_off = utils::deg_to_rad(inner).cos();
        self.outer_cut_off = utils::deg_to_rad(outer).cos();
        self
    }

    /// Set ambient, diffuse and specular intensity as grey levels
    #[must_use]
    pub fn with_intensities(mut self, ambient: f32, diffuse: f32, specular: f32) -> Self {
        self.ambient = Vec3::repeat(ambient);
        self.diffuse = Vec3::repeat(diffuse);
        self.specular = Vec3::repeat(specular);
        self
    }

    /// Cone factor for a fragment: 1 inside the inner cone, 0 outside the
    /// outer cone, linear in the cosine between them
    pub fn cone_intensity(&self, fragment: Vec3) -> f32 {
        let to_fragment = (fragment - self.position).normalize();
        let theta = to_fragment.dot(&self.direction.normalize());
        let epsilon = self.cut_off - self.outer_cut_off;
        if epsilon <= f32::EPSILON {
            return if theta >= self.cut_off { 1.0 } else { 0.0 };
        }
        ((theta - self.outer_cut_off) / epsilon).clamp(0.0, 1.0)
    }

    /// Diffuse contribution scale at `fragment` (cone times attenuation)
    pub fn intensity_at(&self, fragment: Vec3) -> f32 {
        if !self.enabled {
            return 0.0;
        }
        self.cone_intensity(fragment) * self.attenuation.factor((self.position - fragment).norm())
    }
}

impl Default for SpotLight {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 4.0),
            direction: Vec3::new(0.0, 0.0, -1.0),
            cut_off: 0.0,
            outer_cut_off: 0.0,
            ambient: Vec3::repeat(1.0),
            diffuse: Vec3::repeat(1.0),
            specular: Vec3::repeat(1.0),
            attenuation: Attenuation::default(),
            enabled: true,
        }
        .with_cone_degrees(5.5, 11.0)
    }
}

/// Identifies a light by kind and index within its kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightId {
    /// Index into the point lights
    Point(usize),
    /// Index into the spot lights
    Spot(usize),
}

/// A light as seen by the shadow pass generator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowCaster {
    /// Shadow slot (registry order, points first)
    pub slot: usize,
    /// Which light
    pub id: LightId,
    /// World-space position of the light
    pub position: Vec3,
    /// Whether the light is enabled this frame
    pub enabled: bool,
}

/// A light as seen by the marker pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightMarker {
    /// World-space position
    pub position: Vec3,
    /// Marker tint (the light's diffuse color)
    pub color: Vec3,
}

/// Uniform writes per point light
pub const POINT_LIGHT_UNIFORMS: usize = 8;

/// Uniform writes per spot light
pub const SPOT_LIGHT_UNIFORMS: usize = 11;

/// Ordered point and spot lights
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightRegistry {
    /// Point lights, slots `0..point_lights.len()`
    pub point_lights: Vec<PointLight>,
    /// Spot lights, slots after the point lights
    pub spot_lights: Vec<SpotLight>,
}

impl LightRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// The reference scene: one point light and three spot lights, all enabled
    pub fn reference() -> Self {
        Self::new()
            .add_point(PointLight::at(Vec3::new(4.0, 4.0, 3.0)).with_intensities(0.1, 0.6, 1.0))
            .add_spot(
                SpotLight::aimed(Vec3::new(0.0, 2.0, 4.0), Vec3::new(0.0, -1.0, -1.0))
                    .with_intensities(0.0, 1.0, 1.0),
            )
            .add_spot(
                SpotLight::aimed(Vec3::new(-3.0, -3.0, 5.0), Vec3::new(0.4, 0.4, -1.0))
                    .with_intensities(0.0, 0.8, 1.0)
                    .with_cone_degrees(8.0, 14.0),
            )
            .add_spot(
                SpotLight::aimed(Vec3::new(3.0, -3.0, 5.0), Vec3::new(-0.4, 0.4, -1.0))
                    .with_intensities(0.0, 0.8, 1.0)
                    .with_cone_degrees(8.0, 14.0),
            )
    }

    /// Append a point light
    #[must_use]
    pub fn add_point(mut self, light: PointLight) -> Self {
        self.point_lights.push(light);
        self
    }

    /// Append a spot light
    #[must_use]
    pub fn add_spot(mut self, light: SpotLight) -> Self {
        self.spot_lights.push(light);
        self
    }

    /// Total number of lights (and shadow slots)
    pub fn len(&self) -> usize {
        self.point_lights.len() + self.spot_lights.len()
    }

    /// Whether there are no lights
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of enabled lights
    pub fn enabled_count(&self) -> usize {
        self.point_lights.iter().filter(|l| l.enabled).count()
            + self.spot_lights.iter().filter(|l| l.enabled).count()
    }

    /// Shadow slot for a light, `None` if it does not exist
    pub fn shadow_slot(&self, id: LightId) -> Option<usize> {
        match id {
            LightId::Point(i) if i < self.point_lights.len() => Some(i),
            LightId::Spot(i) if i < self.spot_lights.len() => Some(self.point_lights.len() + i),
            _ => None,
        }
    }

    /// Light occupying a shadow slot
    pub fn light_at_slot(&self, slot: usize) -> Option<LightId> {
        let points = self.point_lights.len();
        if slot < points {
            Some(LightId::Point(slot))
        } else if slot < self.len() {
            Some(LightId::Spot(slot - points))
        } else {
            None
        }
    }

    /// Every light in slot order with its position and enabled flag
    pub fn shadow_casters(&self) -> impl Iterator<Item = ShadowCaster> + '_ {
        let points = self.point_lights.iter().enumerate().map(|(i, l)| ShadowCaster {
            slot: i,
            id: LightId::Point(i),
            position: l.position,
            enabled: l.enabled,
        });
        let offset = self.point_lights.len();
        let spots = self.spot_lights.iter().enumerate().map(move |(i, l)| ShadowCaster {
            slot: offset + i,
            id: LightId::Spot(i),
            position: l.position,
            enabled: l.enabled,
        });
        points.chain(spots)
    }

    /// Markers for the enabled lights, points first
    pub fn markers(&self) -> impl Iterator<Item = LightMarker> + '_ {
        let points = self
            .point_lights
            .iter()
            .filter(|l| l.enabled)
            .map(|l| LightMarker { position: l.position, color: l.diffuse });
        let spots = self
            .spot_lights
            .iter()
            .filter(|l| l.enabled)
            .map(|l| LightMarker { position: l.position, color: l.diffuse });
        points.chain(spots)
    }

    /// World-space position of a light
    pub fn position(&self, id: LightId) -> Option<Vec3> {
        match id {
            LightId::Point(i) => self.point_lights.get(i).map(|l| l.position),
            LightId::Spot(i) => self.spot_lights.get(i).map(|l| l.position),
        }
    }

    /// Whether a light is enabled; `None` if it does not exist
    pub fn is_enabled(&self, id: LightId) -> Option<bool> {
        match id {
            LightId::Point(i) => self.point_lights.get(i).map(|l| l.enabled),
            LightId::Spot(i) => self.spot_lights.get(i).map(|l| l.enabled),
        }
    }

    /// Set a light's enabled flag; returns false if the light does not exist
    pub fn set_enabled(&mut self, id: LightId, enabled: bool) -> bool {
        let flag = match id {
            LightId::Point(i) => self.point_lights.get_mut(i).map(|l| &mut l.enabled),
            LightId::Spot(i) => self.spot_lights.get_mut(i).map(|l| &mut l.enabled),
        };
        match flag {
            Some(flag) => {
                *flag = enabled;
                log::info!("Light {:?} {}", id, if enabled { "enabled" } else { "disabled" });
                true
            }
            None => false,
        }
    }

    /// Flip the light in `slot`; returns its new state, `None` for an empty slot
    pub fn toggle(&mut self, slot: usize) -> Option<bool> {
        let id = self.light_at_slot(slot)?;
        let enabled = !self.is_enabled(id)?;
        self.set_enabled(id, enabled);
        Some(enabled)
    }

    /// Number of uniform writes [`Self::push_uniforms`] performs
    pub fn uniform_count(&self) -> usize {
        2 + self.point_lights.len() * POINT_LIGHT_UNIFORMS
            + self.spot_lights.len() * SPOT_LIGHT_UNIFORMS
    }

    /// Write every light's full parameter set into the active stage
    ///
    /// Returns the number of uniform writes, which depends only on the light
    /// counts.
    pub fn push_uniforms(&self, backend: &mut dyn RenderBackend) -> BackendResult<usize> {
        let mut writes = 0;
        let mut set = |name: String, value: crate::render::api::UniformValue| {
            writes += 1;
            backend.set_uniform(&name, value)
        };

        set("pointLightCount".into(), count_uniform(self.point_lights.len()).into())?;
        set("spotLightCount".into(), count_uniform(self.spot_lights.len()).into())?;

        for (i, light) in self.point_lights.iter().enumerate() {
            set(format!("pointLights[{i}].position"), light.position.into())?;
            set(format!("pointLights[{i}].ambient"), light.ambient.into())?;
            set(format!("pointLights[{i}].diffuse"), light.diffuse.into())?;
            set(format!("pointLights[{i}].specular"), light.specular.into())?;
            set(format!("pointLights[{i}].constant"), light.attenuation.constant.into())?;
            set(format!("pointLights[{i}].linear"), light.attenuation.linear.into())?;
            set(format!("pointLights[{i}].quadratic"), light.attenuation.quadratic.into())?;
            set(format!("pointLights[{i}].enabled"), light.enabled.into())?;
        }

        for (i, light) in self.spot_lights.iter().enumerate() {
            set(format!("spotLights[{i}].position"), light.position.into())?;
            set(format!("spotLights[{i}].direction"), light.direction.into())?;
            set(format!("spotLights[{i}].ambient"), light.ambient.into())?;
            set(format!("spotLights[{i}].diffuse"), light.diffuse.into())?;
            set(format!("spotLights[{i}].specular"), light.specular.into())?;
            set(format!("spotLights[{i}].constant"), light.attenuation.constant.into())?;
            set(format!("spotLights[{i}].linear"), light.attenuation.linear.into())?;
            set(format!("spotLights[{i}].quadratic"), light.attenuation.quadratic.into())?;
            set(format!("spotLights[{i}].cutOff"), light.cut_off.into())?;
            set(format!("spotLights[{i}].outerCutOff"), light.outer_cut_off.into())?;
            set(format!("spotLights[{i}].enabled"), light.enabled.into())?;
        }

        Ok(writes)
    }
}

fn count_uniform(count: usize) -> i32 {
    i32::try_from(count).unwrap_or(i32::MAX)
}
