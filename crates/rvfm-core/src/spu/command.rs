//! SPU command shapes and their wire encoding.
//!
//! SPU opcodes are a single byte. Unit commands (envelope, oscillator,
//! filter, pitch, sampler) carry the unit index and a sub-operation byte.

use crate::error::DecodeError;
use crate::recorder::WireCommand;
use crate::wire::{CommandReader, CommandWriter, EncodedCommand};

use super::types::{ChannelCount, FilterMode, LoopMode, MixChannel, PitchMode, Waveform};

pub mod opcode {
    pub const RESET_SAMPLE_COUNTER: u8 = 0x00;
    pub const WAIT_SAMPLE_COUNTER: u8 = 0x01;
    pub const WRITE_FLAG: u8 = 0x02;
    pub const STOP: u8 = 0x04;
    pub const ENVELOPE_COMMAND: u8 = 0x05;
    pub const ENVELOPE_PARAM: u8 = 0x06;
    pub const OSCILLATOR_COMMAND: u8 = 0x07;
    pub const OSCILLATOR_PARAM: u8 = 0x08;
    pub const FILTER_COMMAND: u8 = 0x09;
    pub const FILTER_PARAM: u8 = 0x0A;
    pub const PITCH_COMMAND: u8 = 0x0B;
    pub const PITCH_PARAM: u8 = 0x0C;
    pub const SET_MIX: u8 = 0x0D;
    pub const NOTE_ON: u8 = 0x0E;
    pub const RELATIVE_WAIT: u8 = 0x0F;
    pub const SAMPLER_PARAM: u8 = 0x10;
    pub const SAMPLER_COMMAND: u8 = 0x11;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeOp {
    Mute,
    Off,
    On,
    SetAttack(u32),
    SetDecay(u32),
    SetRelease(u32),
    SetSustain(i16),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OscillatorOp {
    Reset,
    SetParameter { parameter: u8, value: i16 },
    SetPhase { index: u8, value: u16 },
    SetWaveform(Waveform),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Reset,
    SetMode(FilterMode),
    SetResonance(u16),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PitchOp {
    /// Jump straight to the target pitch.
    Finish,
    SetTarget(u16),
    SetSpeed(u16),
    SetMode(PitchMode),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplerOp {
    /// Point the sampler at `sample_count` samples starting at bus address
    /// `start_address`.
    Setup {
        channels: ChannelCount,
        sample_count: u32,
        start_address: u32,
    },
    SetLoopMode(LoopMode),
    Start,
    Continue,
    Pause,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpuCommand {
    ResetSampleCounter(u32),
    /// Stall the queue until the sample counter reaches the value.
    WaitSampleCounter(u32),
    WriteFlag {
        interrupt: bool,
        address: u32,
        value: u32,
    },
    Stop,
    Envelope { envelope: u8, op: EnvelopeOp },
    Oscillator { oscillator: u8, op: OscillatorOp },
    Filter { filter: u8, op: FilterOp },
    Pitch { pitch: u8, op: PitchOp },
    SetMix { channel: MixChannel, mix: i16 },
    NoteOn { voice: u8, frequency: u16 },
    /// Stall the queue for a number of samples.
    RelativeWait(u32),
    Sampler { sampler: u8, op: SamplerOp },
}

impl SpuCommand {
    pub fn opcode(&self) -> u8 {
        match self {
            SpuCommand::ResetSampleCounter(_) => opcode::RESET_SAMPLE_COUNTER,
            SpuCommand::WaitSampleCounter(_) => opcode::WAIT_SAMPLE_COUNTER,
            SpuCommand::WriteFlag { .. } => opcode::WRITE_FLAG,
            SpuCommand::Stop => opcode::STOP,
            SpuCommand::Envelope { op, .. } => match op {
                EnvelopeOp::Mute | EnvelopeOp::Off | EnvelopeOp::On => opcode::ENVELOPE_COMMAND,
                _ => opcode::ENVELOPE_PARAM,
            },
            SpuCommand::Oscillator { op, .. } => match op {
                OscillatorOp::Reset => opcode::OSCILLATOR_COMMAND,
                _ => opcode::OSCILLATOR_PARAM,
            },
            SpuCommand::Filter { op, .. } => match op {
                FilterOp::Reset => opcode::FILTER_COMMAND,
                _ => opcode::FILTER_PARAM,
            },
            SpuCommand::Pitch { op, .. } => match op {
                PitchOp::Finish => opcode::PITCH_COMMAND,
                _ => opcode::PITCH_PARAM,
            },
            SpuCommand::SetMix { .. } => opcode::SET_MIX,
            SpuCommand::NoteOn { .. } => opcode::NOTE_ON,
            SpuCommand::RelativeWait(_) => opcode::RELATIVE_WAIT,
            SpuCommand::Sampler { op, .. } => match op {
                SamplerOp::Setup { .. } | SamplerOp::SetLoopMode(_) => opcode::SAMPLER_PARAM,
                _ => opcode::SAMPLER_COMMAND,
            },
        }
    }
}

fn encode_envelope(w: CommandWriter, envelope: u8, op: &EnvelopeOp) -> CommandWriter {
    let w = w.u8(envelope);
    match op {
        EnvelopeOp::Mute => w.u8(0),
        EnvelopeOp::Off => w.u8(1),
        EnvelopeOp::On => w.u8(2),
        EnvelopeOp::SetAttack(v) => w.u8(0).u32(*v),
        EnvelopeOp::SetDecay(v) => w.u8(1).u32(*v),
        EnvelopeOp::SetRelease(v) => w.u8(2).u32(*v),
        EnvelopeOp::SetSustain(v) => w.u8(3).i16(*v),
    }
}

fn encode_oscillator(w: CommandWriter, oscillator: u8, op: &OscillatorOp) -> CommandWriter {
    let w = w.u8(oscillator);
    match op {
        OscillatorOp::Reset => w.u8(0),
        OscillatorOp::SetParameter { parameter, value } => w.u8(0).u8(*parameter).i16(*value),
        OscillatorOp::SetPhase { index, value } => w.u8(1).u8(*index).u16(*value),
        OscillatorOp::SetWaveform(waveform) => w.u8(2).u8(waveform.bits()),
    }
}

fn encode_filter(w: CommandWriter, filter: u8, op: &FilterOp) -> CommandWriter {
    let w = w.u8(filter);
    match op {
        FilterOp::Reset => w.u8(0),
        FilterOp::SetMode(mode) => w.u8(0).u8(mode.bits()),
        FilterOp::SetResonance(v) => w.u8(1).u16(*v),
    }
}

fn encode_pitch(w: CommandWriter, pitch: u8, op: &PitchOp) -> CommandWriter {
    let w = w.u8(pitch);
    match op {
        PitchOp::Finish => w.u8(0),
        PitchOp::SetTarget(v) => w.u8(0).u16(*v),
        PitchOp::SetSpeed(v) => w.u8(1).u16(*v),
        PitchOp::SetMode(mode) => w.u8(2).u8(mode.bits()),
    }
}

fn encode_sampler(w: CommandWriter, sampler: u8, op: &SamplerOp) -> CommandWriter {
    // The sub-operation precedes the sampler index.
    match op {
        SamplerOp::Setup {
            channels,
            sample_count,
            start_address,
        } => w
            .u8(0)
            .u8(sampler)
            .u8(channels.bits())
            .u32(*sample_count)
            .u32(*start_address),
        SamplerOp::SetLoopMode(mode) => w.u8(1).u8(sampler).u32(mode.bits()),
        SamplerOp::Start => w.u8(0).u8(sampler),
        SamplerOp::Continue => w.u8(1).u8(sampler),
        SamplerOp::Pause => w.u8(2).u8(sampler),
    }
}

struct Decoder<'r, 'b> {
    r: &'r mut CommandReader<'b>,
    op: u8,
}

impl Decoder<'_, '_> {
    fn unknown_subcommand(&self, subcommand: u8, offset: usize) -> DecodeError {
        DecodeError::UnknownSubcommand {
            opcode: self.op as u16,
            subcommand,
            offset,
        }
    }

    /// Read a sub-operation byte.
    fn sub(&mut self) -> Result<(u8, usize), DecodeError> {
        let offset = self.r.consumed();
        Ok((self.r.u8()?, offset))
    }

    fn enum_u8<T>(&mut self, from_bits: impl Fn(u8) -> Option<T>) -> Result<T, DecodeError> {
        let offset = self.r.consumed();
        let bits = self.r.u8()?;
        from_bits(bits).ok_or(DecodeError::InvalidOperand {
            opcode: self.op as u16,
            value: bits as u32,
            offset,
        })
    }

    fn envelope(&mut self) -> Result<SpuCommand, DecodeError> {
        let envelope = self.r.u8()?;
        let (sub, at) = self.sub()?;
        let op = match (self.op, sub) {
            (opcode::ENVELOPE_COMMAND, 0) => EnvelopeOp::Mute,
            (opcode::ENVELOPE_COMMAND, 1) => EnvelopeOp::Off,
            (opcode::ENVELOPE_COMMAND, 2) => EnvelopeOp::On,
            (opcode::ENVELOPE_PARAM, 0) => EnvelopeOp::SetAttack(self.r.u32()?),
            (opcode::ENVELOPE_PARAM, 1) => EnvelopeOp::SetDecay(self.r.u32()?),
            (opcode::ENVELOPE_PARAM, 2) => EnvelopeOp::SetRelease(self.r.u32()?),
            (opcode::ENVELOPE_PARAM, 3) => EnvelopeOp::SetSustain(self.r.i16()?),
            _ => return Err(self.unknown_subcommand(sub, at)),
        };
        Ok(SpuCommand::Envelope { envelope, op })
    }

    fn oscillator(&mut self) -> Result<SpuCommand, DecodeError> {
        let oscillator = self.r.u8()?;
        let (sub, at) = self.sub()?;
        let op = match (self.op, sub) {
            (opcode::OSCILLATOR_COMMAND, 0) => OscillatorOp::Reset,
            (opcode::OSCILLATOR_PARAM, 0) => OscillatorOp::SetParameter {
                parameter: self.r.u8()?,
                value: self.r.i16()?,
            },
            (opcode::OSCILLATOR_PARAM, 1) => OscillatorOp::SetPhase {
                index: self.r.u8()?,
                value: self.r.u16()?,
            },
            (opcode::OSCILLATOR_PARAM, 2) => OscillatorOp::SetWaveform(self.enum_u8(Waveform::from_bits)?),
            _ => return Err(self.unknown_subcommand(sub, at)),
        };
        Ok(SpuCommand::Oscillator { oscillator, op })
    }

    fn filter(&mut self) -> Result<SpuCommand, DecodeError> {
        let filter = self.r.u8()?;
        let (sub, at) = self.sub()?;
        let op = match (self.op, sub) {
            (opcode::FILTER_COMMAND, 0) => FilterOp::Reset,
            (opcode::FILTER_PARAM, 0) => FilterOp::SetMode(self.enum_u8(FilterMode::from_bits)?),
            (opcode::FILTER_PARAM, 1) => FilterOp::SetResonance(self.r.u16()?),
            _ => return Err(self.unknown_subcommand(sub, at)),
        };
        Ok(SpuCommand::Filter { filter, op })
    }

    fn pitch(&mut self) -> Result<SpuCommand, DecodeError> {
        let pitch = self.r.u8()?;
        let (sub, at) = self.sub()?;
        let op = match (self.op, sub) {
            (opcode::PITCH_COMMAND, 0) => PitchOp::Finish,
            (opcode::PITCH_PARAM, 0) => PitchOp::SetTarget(self.r.u16()?),
            (opcode::PITCH_PARAM, 1) => PitchOp::SetSpeed(self.r.u16()?),
            (opcode::PITCH_PARAM, 2) => PitchOp::SetMode(self.enum_u8(PitchMode::from_bits)?),
            _ => return Err(self.unknown_subcommand(sub, at)),
        };
        Ok(SpuCommand::Pitch { pitch, op })
    }

    fn sampler(&mut self) -> Result<SpuCommand, DecodeError> {
        let (sub, at) = self.sub()?;
        let sampler = self.r.u8()?;
        let op = match (self.op, sub) {
            (opcode::SAMPLER_PARAM, 0) => SamplerOp::Setup {
                channels: self.enum_u8(ChannelCount::from_bits)?,
                sample_count: self.r.u32()?,
                start_address: self.r.u32()?,
            },
            (opcode::SAMPLER_PARAM, 1) => SamplerOp::SetLoopMode(LoopMode::from_bits(self.r.u32()?)),
            (opcode::SAMPLER_COMMAND, 0) => SamplerOp::Start,
            (opcode::SAMPLER_COMMAND, 1) => SamplerOp::Continue,
            (opcode::SAMPLER_COMMAND, 2) => SamplerOp::Pause,
            _ => return Err(self.unknown_subcommand(sub, at)),
        };
        Ok(SpuCommand::Sampler { sampler, op })
    }
}

impl WireCommand for SpuCommand {
    fn encode(&self) -> EncodedCommand {
        let w = CommandWriter::new().u8(self.opcode());
        let w = match self {
            SpuCommand::ResetSampleCounter(v)
            | SpuCommand::WaitSampleCounter(v)
            | SpuCommand::RelativeWait(v) => w.u32(*v),
            SpuCommand::WriteFlag {
                interrupt,
                address,
                value,
            } => w.flag(*interrupt).u32(*address).u32(*value),
            SpuCommand::Stop => w,
            SpuCommand::Envelope { envelope, op } => encode_envelope(w, *envelope, op),
            SpuCommand::Oscillator { oscillator, op } => encode_oscillator(w, *oscillator, op),
            SpuCommand::Filter { filter, op } => encode_filter(w, *filter, op),
            SpuCommand::Pitch { pitch, op } => encode_pitch(w, *pitch, op),
            SpuCommand::SetMix { channel, mix } => w.u8(channel.bits()).i16(*mix),
            SpuCommand::NoteOn { voice, frequency } => w.u8(*voice).u16(*frequency),
            SpuCommand::Sampler { sampler, op } => encode_sampler(w, *sampler, op),
        };
        w.finish()
    }

    fn decode(bytes: &[u8]) -> Result<(Self, usize), DecodeError> {
        let mut r = CommandReader::new(bytes);
        let op = r.u8()?;
        let mut d = Decoder { r: &mut r, op };
        let command = match op {
            opcode::RESET_SAMPLE_COUNTER => SpuCommand::ResetSampleCounter(d.r.u32()?),
            opcode::WAIT_SAMPLE_COUNTER => SpuCommand::WaitSampleCounter(d.r.u32()?),
            opcode::WRITE_FLAG => SpuCommand::WriteFlag {
                interrupt: d.r.flag()?,
                address: d.r.u32()?,
                value: d.r.u32()?,
            },
            opcode::STOP => SpuCommand::Stop,
            opcode::ENVELOPE_COMMAND | opcode::ENVELOPE_PARAM => d.envelope()?,
            opcode::OSCILLATOR_COMMAND | opcode::OSCILLATOR_PARAM => d.oscillator()?,
            opcode::FILTER_COMMAND | opcode::FILTER_PARAM => d.filter()?,
            opcode::PITCH_COMMAND | opcode::PITCH_PARAM => d.pitch()?,
            opcode::SET_MIX => SpuCommand::SetMix {
                channel: MixChannel::from_bits(d.r.u8()?),
                mix: d.r.i16()?,
            },
            opcode::NOTE_ON => SpuCommand::NoteOn {
                voice: d.r.u8()?,
                frequency: d.r.u16()?,
            },
            opcode::RELATIVE_WAIT => SpuCommand::RelativeWait(d.r.u32()?),
            opcode::SAMPLER_PARAM | opcode::SAMPLER_COMMAND => d.sampler()?,
            _ => {
                return Err(DecodeError::UnknownOpcode {
                    opcode: op as u16,
                    offset: 0,
                })
            }
        };
        Ok((command, r.consumed()))
    }
}
