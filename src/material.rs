use crate::picture::Color;

#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    /// Base color, channels in `0.0..=255.0`.
    pub color: Color,
    /// Phong exponent. `None` means the surface has no highlight at all.
    pub specular: Option<i32>,
    /// Share of the final color taken from the mirrored ray, `0.0..=1.0`.
    pub reflective: f64,
}

impl Material {
    /// A negative `specular` disables the highlight.
    pub fn new(color: Color, specular: i32, reflective: f64) -> Material {
        Material {
            color,
            specular: (specular >= 0).then_some(specular),
            reflective: reflective.clamp(0.0, 1.0),
        }
    }

    pub fn matte(color: Color) -> Material {
        Material { color, specular: None, reflective: 0.0 }
    }

    pub fn is_reflective(&self) -> bool {
        self.reflective > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_specular_means_none() {
        assert_eq!(Material::new(Color::WHITE, -1, 0.0).specular, None);
        assert_eq!(Material::new(Color::WHITE, 0, 0.0).specular, Some(0));
        assert_eq!(Material::new(Color::WHITE, 500, 0.0).specular, Some(500));
    }

    #[test]
    fn reflective_is_clamped() {
        assert_eq!(Material::new(Color::WHITE, 10, 1.5).reflective, 1.0);
        assert!(!Material::new(Color::WHITE, 10, -0.5).is_reflective());
        assert!(Material::new(Color::WHITE, 10, 0.2).is_reflective());
    }
}
