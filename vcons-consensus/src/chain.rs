use crate::decorators::{AlleleFrequencyDecorator, FrequencyBounds, InversionDecorator};
use crate::encoder::{BaseEncoder, Encoder};

/// Which decorators wrap the base encoder.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EncoderConfig {
    pub invert: bool,
    pub frequency: Option<FrequencyBounds>,
}

impl EncoderConfig {
    ///
    /// Build the encoder chain: frequency gate (outermost) → inversion → base.
    ///
    /// Records rejected by the frequency gate keep their reference allele
    /// as-is, they are not complemented.
    ///
    pub fn build_encoder(&self) -> Box<dyn Encoder> {
        let mut encoder: Box<dyn Encoder> = Box::new(BaseEncoder);
        if self.invert {
            encoder = Box::new(InversionDecorator::new(encoder));
        }
        if let Some(bounds) = self.frequency {
            encoder = Box::new(AlleleFrequencyDecorator::new(bounds, encoder));
        }
        encoder
    }
}
