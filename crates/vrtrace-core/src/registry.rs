//! Camera type registry.

use std::collections::HashMap;

use crate::camera::{CameraModel, OffAxisCamera, PerspectiveCamera};
use crate::error::{Result, VrTraceError};

/// Named constructor for a camera model.
pub type CameraConstructor = fn() -> Box<dyn CameraModel>;

/// Factory table mapping camera type names to constructors.
///
/// Render backends look camera types up by name, so new camera models can be
/// plugged in without the backend knowing their concrete type.
#[derive(Default)]
pub struct CameraRegistry {
    constructors: HashMap<String, CameraConstructor>,
}

impl CameraRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the built-in `"vr"` and `"perspective"` cameras.
    pub fn with_builtin() -> Self {
        let builtin: [(&str, CameraConstructor); 2] = [
            (OffAxisCamera::TYPE_NAME, || Box::new(OffAxisCamera)),
            (PerspectiveCamera::TYPE_NAME, || Box::new(PerspectiveCamera)),
        ];
        let mut registry = Self::new();
        for (name, constructor) in builtin {
            registry.constructors.insert(name.to_string(), constructor);
        }
        registry
    }

    /// Registers a camera constructor under `name`.
    ///
    /// Returns an error if the name is already taken.
    pub fn register(&mut self, name: impl Into<String>, constructor: CameraConstructor) -> Result<()> {
        let name = name.into();
        if self.constructors.contains_key(&name) {
            return Err(VrTraceError::CameraTypeExists(name));
        }
        log::debug!("registered camera type '{name}'");
        self.constructors.insert(name, constructor);
        Ok(())
    }

    /// Instantiates the camera registered under `name`.
    pub fn create(&self, name: &str) -> Result<Box<dyn CameraModel>> {
        self.constructors
            .get(name)
            .map(|construct| construct())
            .ok_or_else(|| VrTraceError::UnknownCameraType(name.to_string()))
    }

    /// Checks if a camera type with the given name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Returns the registered type names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Returns the number of registered camera types.
    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    /// Returns true if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{CameraBasis, CameraParams};
    use glam::Vec3;

    struct FixedCamera;

    impl CameraModel for FixedCamera {
        fn type_name(&self) -> &'static str {
            "fixed"
        }

        fn commit(&self, _params: &CameraParams) -> Result<CameraBasis> {
            Ok(CameraBasis {
                origin: Vec3::ZERO,
                dir00: Vec3::NEG_Z,
                du: Vec3::X,
                dv: Vec3::Y,
            })
        }
    }

    #[test]
    fn test_builtin_types() {
        let registry = CameraRegistry::with_builtin();
        assert_eq!(registry.names(), vec!["perspective", "vr"]);
        assert_eq!(registry.create("vr").unwrap().type_name(), "vr");
        assert_eq!(
            registry.create("perspective").unwrap().type_name(),
            "perspective"
        );
    }

    #[test]
    fn test_unknown_type() {
        let registry = CameraRegistry::with_builtin();
        assert!(matches!(
            registry.create("panoramic"),
            Err(VrTraceError::UnknownCameraType(name)) if name == "panoramic"
        ));
    }

    #[test]
    fn test_register_custom_type() {
        let mut registry = CameraRegistry::new();
        assert!(registry.is_empty());
        registry.register("fixed", || Box::new(FixedCamera)).unwrap();
        assert!(registry.contains("fixed"));
        assert!(registry.register("fixed", || Box::new(FixedCamera)).is_err());

        let camera = registry.create("fixed").unwrap();
        let basis = camera.commit(&CameraParams::default()).unwrap();
        assert_eq!(basis.dir00, Vec3::NEG_Z);
        assert_eq!(registry.len(), 1);
    }
}
