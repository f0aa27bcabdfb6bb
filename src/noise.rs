use glam::Vec3;
use noise::{NoiseFn, Perlin};
use rand::Rng;

/// Multi-octave value noise over the unit sphere.
///
/// An immutable bundle of per-octave seeds plus amplitude/frequency scaling.
/// Sampling is pure and deterministic: the same position and seeds always
/// produce the same value, so generation stages can share one instance
/// without coupling their outputs.
#[derive(Debug, Clone)]
pub struct OctaveNoise {
    layers: Vec<Perlin>,
    amplitude_scale: f32,
    frequency_scale: f32,
    max_amplitude: f32,
}

impl OctaveNoise {
    /// Build a generator with `octaves` layers, drawing one seed per octave
    /// from `rng`. Each octave's amplitude is scaled by `amplitude_scale`
    /// and its frequency by `frequency_scale` relative to the previous one.
    pub fn new(
        rng: &mut impl Rng,
        octaves: u32,
        amplitude_scale: f32,
        frequency_scale: f32,
    ) -> Self {
        let layers: Vec<Perlin> = (0..octaves.max(1))
            .map(|_| Perlin::new(rng.r#gen::<u32>()))
            .collect();

        // Geometric series of octave amplitudes, used to rescale the sum
        // back into roughly [-1, 1].
        let octaves = layers.len() as i32;
        let max_amplitude = if (amplitude_scale - 1.0).abs() < 1e-6 {
            octaves as f32
        } else {
            (1.0 - amplitude_scale.powi(octaves)) / (1.0 - amplitude_scale)
        };

        OctaveNoise {
            layers,
            amplitude_scale,
            frequency_scale,
            max_amplitude,
        }
    }

    /// Sample the noise field at a 3D position. Result is roughly in [-1, 1].
    pub fn sample(&self, pos: Vec3) -> f32 {
        let mut total = 0.0f32;
        let mut amplitude = 1.0f32;
        let mut frequency = 1.0f32;
        for layer in &self.layers {
            let p = pos * frequency;
            total += amplitude * layer.get([p.x as f64, p.y as f64, p.z as f64]) as f32;
            amplitude *= self.amplitude_scale;
            frequency *= self.frequency_scale;
        }
        total / self.max_amplitude
    }
}
