//! Omnidirectional shadow pass generator
//!
//! Every light owns one depth cube map. Per frame, each enabled light gets a
//! depth-only pass: its target is bound and cleared, the depth stage receives
//! six face view-projection matrices plus the light position and far plane
//! (the stage writes `distance / far_plane` as depth), and the board and
//! pieces are drawn. Light markers never cast shadows.
//!
//! Depth targets are allocated once for every registry slot, so toggling a
//! light never reallocates. A disabled light's map goes stale; the lit stage
//! only samples maps whose light has `enabled = true`.

use crate::foundation::math::{utils, Mat4, Mat4Ext, Vec3};
use crate::render::api::{BackendResult, DepthTargetHandle, RenderBackend, ShaderStage};
use crate::render::lighting::LightRegistry;
use crate::render::RenderError;
use serde::{Deserialize, Serialize};

/// Shadow map parameters shared by the depth and lit stages
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowSettings {
    /// Edge length of each cube face in texels
    pub resolution: u32,
    /// Near plane of the face projections
    pub near_plane: f32,
    /// Far plane of the face projections, also the depth linearization range
    pub far_plane: f32,
    /// First texture unit used for depth maps; slot `i` binds to `base + i`
    pub depth_map_base_slot: u32,
}

impl Default for ShadowSettings {
    fn default() -> Self {
        Self {
            resolution: 2048,
            near_plane: 1.0,
            far_plane: 25.0,
            depth_map_base_slot: 15,
        }
    }
}

/// Cube map faces in layer order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CubeFace {
    /// +X
    PositiveX,
    /// −X
    NegativeX,
    /// +Y
    PositiveY,
    /// −Y
    NegativeY,
    /// +Z
    PositiveZ,
    /// −Z
    NegativeZ,
}

impl CubeFace {
    /// All faces in layer order
    pub const ALL: [CubeFace; 6] = [
        CubeFace::PositiveX,
        CubeFace::NegativeX,
        CubeFace::PositiveY,
        CubeFace::NegativeY,
        CubeFace::PositiveZ,
        CubeFace::NegativeZ,
    ];

    /// Axis the face looks along
    pub fn direction(self) -> Vec3 {
        match self {
            CubeFace::PositiveX => Vec3::new(1.0, 0.0, 0.0),
            CubeFace::NegativeX => Vec3::new(-1.0, 0.0, 0.0),
            CubeFace::PositiveY => Vec3::new(0.0, 1.0, 0.0),
            CubeFace::NegativeY => Vec3::new(0.0, -1.0, 0.0),
            CubeFace::PositiveZ => Vec3::new(0.0, 0.0, 1.0),
            CubeFace::NegativeZ => Vec3::new(0.0, 0.0, -1.0),
        }
    }

    /// Up vector matching the cube map texel orientation of the face.
    /// Changing these rotates the sampled shadows.
    pub fn up(self) -> Vec3 {
        match self {
            CubeFace::PositiveY => Vec3::new(0.0, 0.0, 1.0),
            CubeFace::NegativeY => Vec3::new(0.0, 0.0, -1.0),
            _ => Vec3::new(0.0, -1.0, 0.0),
        }
    }
}

/// The 90° square projection shared by all six faces
pub fn cube_face_projection(settings: &ShadowSettings) -> Mat4 {
    Mat4::perspective(utils::deg_to_rad(90.0), 1.0, settings.near_plane, settings.far_plane)
}

/// View-projection matrices for the six faces around `light_position`
pub fn cube_face_transforms(light_position: Vec3, settings: &ShadowSettings) -> [Mat4; 6] {
    let projection = cube_face_projection(settings);
    CubeFace::ALL.map(|face| {
        projection * Mat4::look_at(light_position, light_position + face.direction(), face.up())
    })
}

/// Write the depth stage inputs for one light
pub fn push_depth_uniforms(
    backend: &mut dyn RenderBackend,
    light_position: Vec3,
    settings: &ShadowSettings,
) -> BackendResult<()> {
    for (i, transform) in cube_face_transforms(light_position, settings).into_iter().enumerate() {
        backend.set_uniform(&format!("shadowMatrices[{i}]"), transform.into())?;
    }
    backend.set_uniform("far_plane", settings.far_plane.into())?;
    backend.set_uniform("lightPos", light_position.into())?;
    Ok(())
}

/// One depth cube target per registry slot
#[derive(Debug, Clone)]
pub struct ShadowMaps {
    targets: Vec<DepthTargetHandle>,
    settings: ShadowSettings,
}

impl ShadowMaps {
    /// Allocate `light_count` depth cube targets
    pub fn allocate(
        backend: &mut dyn RenderBackend,
        light_count: usize,
        settings: ShadowSettings,
    ) -> BackendResult<Self> {
        if settings.resolution == 0 {
            return Err(RenderError::InitializationFailed(
                "shadow map resolution must be non-zero".to_string(),
            ));
        }
        let targets = (0..light_count)
            .map(|_| backend.create_depth_cube_target(settings.resolution))
            .collect::<BackendResult<Vec<_>>>()?;
        log::info!(
            "Allocated {} depth cube maps at {}x{}",
            targets.len(),
            settings.resolution,
            settings.resolution
        );
        Ok(Self { targets, settings })
    }

    /// Number of allocated targets
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Whether no targets were allocated
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Target for a slot
    pub fn target(&self, slot: usize) -> Option<DepthTargetHandle> {
        self.targets.get(slot).copied()
    }

    /// Shared settings
    pub fn settings(&self) -> &ShadowSettings {
        &self.settings
    }

    /// Texture unit a slot binds to
    #[allow(clippy::cast_possible_truncation)]
    pub fn texture_unit(&self, slot: usize) -> u32 {
        self.settings.depth_map_base_slot + slot as u32
    }

    /// Bind every slot's map for the lit stage and write `depthMaps[i]` and
    /// `far_plane`; returns the number of bindings
    pub fn bind_for_lighting(&self, backend: &mut dyn RenderBackend) -> BackendResult<usize> {
        for (slot, &target) in self.targets.iter().enumerate() {
            let unit = self.texture_unit(slot);
            backend.bind_depth_cube(unit, target)?;
            #[allow(clippy::cast_possible_wrap)]
            let sampler = unit as i32;
            backend.set_uniform(&format!("depthMaps[{slot}]"), sampler.into())?;
        }
        backend.set_uniform("far_plane", self.settings.far_plane.into())?;
        Ok(self.targets.len())
    }

    /// Run the depth pass of every enabled light in slot order
    ///
    /// `draw_casters` receives the slot and draws the shadow-casting geometry
    /// with the depth stage active. Returns the slots that were rendered.
    pub fn render_passes<F>(
        &self,
        backend: &mut dyn RenderBackend,
        lights: &LightRegistry,
        mut draw_casters: F,
    ) -> BackendResult<Vec<usize>>
    where
        F: FnMut(&mut dyn RenderBackend, usize) -> BackendResult<()>,
    {
        let mut rendered = Vec::with_capacity(self.targets.len());
        for caster in lights.shadow_casters() {
            if !caster.enabled {
                log::trace!("Skipping shadow pass for disabled light {:?}", caster.id);
                continue;
            }
            let Some(target) = self.target(caster.slot) else {
                log::warn!("No depth target for shadow slot {}", caster.slot);
                continue;
            };

            backend.begin_depth_pass(target)?;
            backend.use_stage(ShaderStage::Depth)?;
            push_depth_uniforms(backend, caster.position, &self.settings)?;
            draw_casters(backend, caster.slot)?;
            rendered.push(caster.slot);
        }
        Ok(rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Point3;
    use crate::render::backends::{BackendCall, RecordingBackend};
    use crate::render::lighting::{LightId, PointLight};
    use approx::assert_relative_eq;

    /// Recover the view matrix by removing the shared projection
    fn view_of(transform: &Mat4, settings: &ShadowSettings) -> Mat4 {
        cube_face_projection(settings).try_inverse().unwrap() * transform
    }

    #[test]
    fn faces_look_along_the_six_axes() {
        let settings = ShadowSettings::default();
        let light = Vec3::new(0.0, 2.0, 4.0);
        let transforms = cube_face_transforms(light, &settings);

        let expected = [
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, -1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(0.0, 0.0, -1.0),
        ];

        for (transform, direction) in transforms.iter().zip(expected) {
            let view = view_of(transform, &settings);
            // View space looks down -Z, so the third row is -forward.
            let forward = -Vec3::new(view[(2, 0)], view[(2, 1)], view[(2, 2)]);
            assert_relative_eq!(forward, direction, epsilon = 1e-5);

            // The target one unit along the face axis lands on the view axis.
            let target = view.transform_point(&Point3::from(light + direction));
            assert_relative_eq!(target.coords, Vec3::new(0.0, 0.0, -1.0), epsilon = 1e-5);
        }
    }

    #[test]
    fn faces_use_documented_up_vectors() {
        let settings = ShadowSettings::default();
        let transforms = cube_face_transforms(Vec3::new(1.0, -2.0, 3.0), &settings);
        let ups = [
            Vec3::new(0.0, -1.0, 0.0),
            Vec3::new(0.0, -1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::new(0.0, -1.0, 0.0),
            Vec3::new(0.0, -1.0, 0.0),
        ];
        for ((transform, up), face) in transforms.iter().zip(ups).zip(CubeFace::ALL) {
            assert_relative_eq!(face.up(), up);
            let view = view_of(transform, &settings);
            let camera_up = Vec3::new(view[(1, 0)], view[(1, 1)], view[(1, 2)]);
            assert_relative_eq!(camera_up, up, epsilon = 1e-5);
        }
    }

    #[test]
    fn disabled_lights_get_no_pass() {
        let mut lights = crate::render::lighting::LightRegistry::reference();
        lights.set_enabled(LightId::Spot(0), false);

        let mut backend = RecordingBackend::new();
        let maps = ShadowMaps::allocate(&mut backend, lights.len(), ShadowSettings::default()).unwrap();
        assert_eq!(maps.len(), 4);

        let rendered = maps.render_passes(&mut backend, &lights, |_, _| Ok(())).unwrap();
        assert_eq!(rendered, vec![0, 2, 3]);
        assert_eq!(backend.count(|c| matches!(c, BackendCall::BeginDepthPass { .. })), 3);
    }

    #[test]
    fn zero_lights_run_no_passes() {
        let lights = crate::render::lighting::LightRegistry::new();
        let mut backend = RecordingBackend::new();
        let maps = ShadowMaps::allocate(&mut backend, 0, ShadowSettings::default()).unwrap();
        assert!(maps.is_empty());
        let rendered = maps.render_passes(&mut backend, &lights, |_, _| Ok(())).unwrap();
        assert!(rendered.is_empty());
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn depth_pass_writes_matrices_light_and_far_plane() {
        let lights = crate::render::lighting::LightRegistry::new()
            .add_point(PointLight::at(Vec3::new(4.0, 4.0, 3.0)));
        let mut backend = RecordingBackend::new();
        let maps = ShadowMaps::allocate(&mut backend, 1, ShadowSettings::default()).unwrap();
        maps.render_passes(&mut backend, &lights, |_, _| Ok(())).unwrap();

        for i in 0..6 {
            assert!(backend.last_uniform(&format!("shadowMatrices[{i}]")).is_some());
        }
        assert_eq!(
            backend.last_uniform("far_plane"),
            Some(crate::render::api::UniformValue::Float(25.0))
        );
        assert_eq!(
            backend.last_uniform("lightPos"),
            Some(crate::render::api::UniformValue::Vec3(Vec3::new(4.0, 4.0, 3.0)))
        );
    }

    #[test]
    fn texture_units_start_at_base_slot() {
        let mut backend = RecordingBackend::new();
        let maps = ShadowMaps::allocate(&mut backend, 4, ShadowSettings::default()).unwrap();
        assert_eq!(maps.texture_unit(0), 15);
        assert_eq!(maps.texture_unit(3), 18);

        let bound = maps.bind_for_lighting(&mut backend).unwrap();
        assert_eq!(bound, 4);
        assert_eq!(
            backend.last_uniform("depthMaps[3]"),
            Some(crate::render::api::UniformValue::Int(18))
        );
    }

    #[test]
    fn zero_resolution_is_rejected() {
        let mut backend = RecordingBackend::new();
        let settings = ShadowSettings { resolution: 0, ..ShadowSettings::default() };
        assert!(ShadowMaps::allocate(&mut backend, 1, settings).is_err());
    }
}
