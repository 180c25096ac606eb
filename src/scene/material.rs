use crate::scene::texture::Texture;

/// Surface textures of one mesh. Any slot may be empty; the pixel shader falls
/// back to a neutral value for missing maps.
#[derive(Debug, Clone, Default)]
pub struct Material {
    pub diffuse: Option<Texture>,
    pub normal: Option<Texture>,
    pub specular: Option<Texture>,
    pub glossiness: Option<Texture>,
}

/// Which texture maps a material provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MaterialCapabilities {
    pub has_diffuse: bool,
    pub has_normal: bool,
    pub has_specular: bool,
    pub has_glossiness: bool,
}

impl Material {
    pub fn capabilities(&self) -> MaterialCapabilities {
        MaterialCapabilities {
            has_diffuse: self.diffuse.is_some(),
            has_normal: self.normal.is_some(),
            has_specular: self.specular.is_some(),
            has_glossiness: self.glossiness.is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capabilities_follow_present_maps() {
        let material = Material {
            diffuse: Texture::from_rgba(1, 1, vec![255; 4]).ok(),
            ..Default::default()
        };
        let caps = material.capabilities();
        assert!(caps.has_diffuse);
        assert!(!caps.has_normal && !caps.has_specular && !caps.has_glossiness);
    }
}
