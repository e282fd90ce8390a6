//! SPU convenience encoders on the recorder.

use crate::completion::EffectFlag;
use crate::error::BufferFull;
use crate::recorder::Recorder;

use super::command::{EnvelopeOp, FilterOp, OscillatorOp, PitchOp, SamplerOp, SpuCommand};
use super::types::{ChannelCount, FilterMode, LoopMode, MixChannel, PitchMode, Waveform};
use super::Spu;

impl<'a> Recorder<'a, Spu> {
    pub fn reset_sample_counter(&mut self, value: u32) -> Result<(), BufferFull> {
        self.record(&SpuCommand::ResetSampleCounter(value))
    }

    /// Stall the queue until the sample counter reaches `value`.
    pub fn wait_sample_counter(&mut self, value: u32) -> Result<(), BufferFull> {
        self.record(&SpuCommand::WaitSampleCounter(value))
    }

    pub fn write_flag(&mut self, flag: &EffectFlag<'_>, interrupt: bool) -> Result<(), BufferFull> {
        self.record(&SpuCommand::WriteFlag {
            interrupt,
            address: flag.address(),
            value: flag.value(),
        })
    }

    pub fn stop(&mut self) -> Result<(), BufferFull> {
        self.record(&SpuCommand::Stop)
    }

    fn envelope(&mut self, envelope: u8, op: EnvelopeOp) -> Result<(), BufferFull> {
        self.record(&SpuCommand::Envelope { envelope, op })
    }

    pub fn envelope_mute(&mut self, envelope: u8) -> Result<(), BufferFull> {
        self.envelope(envelope, EnvelopeOp::Mute)
    }

    /// Enter the release phase.
    pub fn envelope_off(&mut self, envelope: u8) -> Result<(), BufferFull> {
        self.envelope(envelope, EnvelopeOp::Off)
    }

    /// Restart from the attack phase.
    pub fn envelope_on(&mut self, envelope: u8) -> Result<(), BufferFull> {
        self.envelope(envelope, EnvelopeOp::On)
    }

    pub fn envelope_set_attack(&mut self, envelope: u8, samples: u32) -> Result<(), BufferFull> {
        self.envelope(envelope, EnvelopeOp::SetAttack(samples))
    }

    pub fn envelope_set_decay(&mut self, envelope: u8, samples: u32) -> Result<(), BufferFull> {
        self.envelope(envelope, EnvelopeOp::SetDecay(samples))
    }

    pub fn envelope_set_release(&mut self, envelope: u8, samples: u32) -> Result<(), BufferFull> {
        self.envelope(envelope, EnvelopeOp::SetRelease(samples))
    }

    pub fn envelope_set_sustain(&mut self, envelope: u8, level: i16) -> Result<(), BufferFull> {
        self.envelope(envelope, EnvelopeOp::SetSustain(level))
    }

    fn oscillator(&mut self, oscillator: u8, op: OscillatorOp) -> Result<(), BufferFull> {
        self.record(&SpuCommand::Oscillator { oscillator, op })
    }

    pub fn oscillator_reset(&mut self, oscillator: u8) -> Result<(), BufferFull> {
        self.oscillator(oscillator, OscillatorOp::Reset)
    }

    pub fn oscillator_set_parameter(
        &mut self,
        oscillator: u8,
        parameter: u8,
        value: i16,
    ) -> Result<(), BufferFull> {
        self.oscillator(oscillator, OscillatorOp::SetParameter { parameter, value })
    }

    pub fn oscillator_set_phase(
        &mut self,
        oscillator: u8,
        index: u8,
        value: u16,
    ) -> Result<(), BufferFull> {
        self.oscillator(oscillator, OscillatorOp::SetPhase { index, value })
    }

    pub fn oscillator_set_waveform(
        &mut self,
        oscillator: u8,
        waveform: Waveform,
    ) -> Result<(), BufferFull> {
        self.oscillator(oscillator, OscillatorOp::SetWaveform(waveform))
    }

    pub fn filter_reset(&mut self, filter: u8) -> Result<(), BufferFull> {
        self.record(&SpuCommand::Filter {
            filter,
            op: FilterOp::Reset,
        })
    }

    pub fn filter_set_mode(&mut self, filter: u8, mode: FilterMode) -> Result<(), BufferFull> {
        self.record(&SpuCommand::Filter {
            filter,
            op: FilterOp::SetMode(mode),
        })
    }

    pub fn filter_set_resonance(&mut self, filter: u8, resonance: u16) -> Result<(), BufferFull> {
        self.record(&SpuCommand::Filter {
            filter,
            op: FilterOp::SetResonance(resonance),
        })
    }

    fn pitch(&mut self, pitch: u8, op: PitchOp) -> Result<(), BufferFull> {
        self.record(&SpuCommand::Pitch { pitch, op })
    }

    pub fn pitch_finish(&mut self, pitch: u8) -> Result<(), BufferFull> {
        self.pitch(pitch, PitchOp::Finish)
    }

    pub fn pitch_set_target(&mut self, pitch: u8, target: u16) -> Result<(), BufferFull> {
        self.pitch(pitch, PitchOp::SetTarget(target))
    }

    pub fn pitch_set_speed(&mut self, pitch: u8, speed: u16) -> Result<(), BufferFull> {
        self.pitch(pitch, PitchOp::SetSpeed(speed))
    }

    pub fn pitch_set_mode(&mut self, pitch: u8, mode: PitchMode) -> Result<(), BufferFull> {
        self.pitch(pitch, PitchOp::SetMode(mode))
    }

    pub fn set_mix(&mut self, channel: MixChannel, mix: i16) -> Result<(), BufferFull> {
        self.record(&SpuCommand::SetMix { channel, mix })
    }

    pub fn note_on(&mut self, voice: u8, frequency: u16) -> Result<(), BufferFull> {
        self.record(&SpuCommand::NoteOn { voice, frequency })
    }

    /// Stall the queue for `samples` samples.
    pub fn relative_wait(&mut self, samples: u32) -> Result<(), BufferFull> {
        self.record(&SpuCommand::RelativeWait(samples))
    }

    fn sampler(&mut self, sampler: u8, op: SamplerOp) -> Result<(), BufferFull> {
        self.record(&SpuCommand::Sampler { sampler, op })
    }

    /// `start_address` is the bus address of the first sample.
    pub fn sampler_setup(
        &mut self,
        sampler: u8,
        channels: ChannelCount,
        sample_count: u32,
        start_address: u32,
    ) -> Result<(), BufferFull> {
        self.sampler(
            sampler,
            SamplerOp::Setup {
                channels,
                sample_count,
                start_address,
            },
        )
    }

    pub fn sampler_set_loop_mode(&mut self, sampler: u8, mode: LoopMode) -> Result<(), BufferFull> {
        self.sampler(sampler, SamplerOp::SetLoopMode(mode))
    }

    pub fn sampler_start(&mut self, sampler: u8) -> Result<(), BufferFull> {
        self.sampler(sampler, SamplerOp::Start)
    }

    pub fn sampler_continue(&mut self, sampler: u8) -> Result<(), BufferFull> {
        self.sampler(sampler, SamplerOp::Continue)
    }

    pub fn sampler_pause(&mut self, sampler: u8) -> Result<(), BufferFull> {
        self.sampler(sampler, SamplerOp::Pause)
    }
}
