//! SPU opcode space.

pub mod command;
mod encoders;
pub mod types;

pub use command::{opcode, EnvelopeOp, FilterOp, OscillatorOp, PitchOp, SamplerOp, SpuCommand};
pub use types::{ChannelCount, FilterMode, LoopMode, MixChannel, PitchMode, StereoSide, Waveform};

/// Marker for lists consumed by one of the SPU queues.
#[derive(Debug)]
pub enum Spu {}

impl crate::recorder::Coprocessor for Spu {
    const NAME: &'static str = "SPU";
    type Command = SpuCommand;
}
