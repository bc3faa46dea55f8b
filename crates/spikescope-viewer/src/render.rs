//! The macroquad frame sink.
//!
//! Draws one frame per tick: clear to the background color, one small
//! circle per active neuron at its pixel position, excitatory and
//! inhibitory neurons in their palette colors, then swap.

use async_trait::async_trait;
use macroquad::color::Color;
use macroquad::shapes::draw_circle;
use macroquad::window::{clear_background, next_frame};

use spikescope_core::config::{PaletteConfig, Rgb};
use spikescope_core::engine::{FrameError, FrameSink};
use spikescope_core::{ActiveSet, NeuronCatalog};

/// Marker radius in pixels.
const MARKER_RADIUS: f32 = 1.0;

/// Frame sink backed by the macroquad window.
pub struct MacroquadSink {
    background: Color,
    excitatory: Color,
    inhibitory: Color,
}

impl MacroquadSink {
    /// Build a sink from the configured palette.
    pub fn new(palette: &PaletteConfig) -> Self {
        Self {
            background: to_color(palette.background),
            excitatory: to_color(palette.excitatory),
            inhibitory: to_color(palette.inhibitory),
        }
    }
}

fn to_color(rgb: Rgb) -> Color {
    Color::from_rgba(rgb.r, rgb.g, rgb.b, 255)
}

#[async_trait(?Send)]
impl FrameSink for MacroquadSink {
    async fn present(
        &mut self,
        _time: f64,
        active: &ActiveSet,
        catalog: &NeuronCatalog,
    ) -> Result<(), FrameError> {
        clear_background(self.background);

        for (neuron, _fired_at) in active.iter() {
            let descriptor =
                catalog
                    .descriptor(neuron)
                    .ok_or(FrameError::UnknownNeuron {
                        neuron,
                        catalog_len: catalog.len(),
                    })?;
            let color = if descriptor.inhibitory {
                self.inhibitory
            } else {
                self.excitatory
            };
            let (x, y) = descriptor.position;
            draw_circle(x as f32, y as f32, MARKER_RADIUS, color);
        }

        next_frame().await;
        Ok(())
    }
}
