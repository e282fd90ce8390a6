//! Canned workloads driven through the public protocol.
//!
//! Each demo records real lists with the encoders, submits them through
//! [`Hardware`](rvfm_core::Hardware) and waits on the same fences and
//! effect flags a program on the machine would use.

use core::num::NonZeroU32;

use rvfm_core::gpu::{
    ImageDataLayout, PixelDataLayout, TextureConfig, VideoLayers, VideoMode, VideoResolution,
};
use rvfm_core::spu::{MixChannel, Waveform};
use rvfm_core::{
    BufferFull, CompletionCell, Coprocessor, EffectFlag, Gpu, GpuQueue, InFlight, Interrupt,
    OwnedRegion, Recorder, SampleRate, Spu, SpuQueue,
};

use crate::error::SimError;
use crate::machine::SimMachine;
use crate::trace::TraceEvent;
use crate::wait::SimWait;

/// Value the SPU demo's write-flag command stores.
pub const PHRASE_DONE: NonZeroU32 = NonZeroU32::MIN.saturating_add(0x50);

const FRAMES: u8 = 2;
const NOTE_SAMPLES: u32 = 4_800;

/// Which workload [`run`] drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Demo {
    Gpu,
    Spu,
    All,
}

/// What a demo run did.
#[derive(Debug, Default)]
pub struct DemoReport {
    /// Lists submitted and reclaimed.
    pub lists: usize,
    /// Waits spent on fences and flags.
    pub waits: usize,
    pub trace: Vec<TraceEvent>,
}

/// One frame: set up a texture, clear it to a frame-dependent colour and
/// present it.
pub fn record_gpu_frame(
    recorder: &mut Recorder<'_, Gpu>,
    present: &EffectFlag<'_>,
    frame: u8,
) -> Result<(), BufferFull> {
    if frame == 0 {
        recorder.set_video_mode(VideoMode::new(
            VideoResolution::R256x192,
            VideoLayers::TRIANGLES,
        ))?;
        let texture = TextureConfig {
            width: 256,
            height: 192,
            pixel_layout: PixelDataLayout::D8x4,
            image_layout: ImageDataLayout::Contiguous,
        };
        log::debug!("texture 0: {}x{}, {} bytes", texture.width, texture.height, texture.byte_len());
        recorder.configure_texture(0, &texture)?;
    }
    recorder.set_constant_sampler_unorm8(0, [frame.wrapping_mul(0x40), 0x20, 0x80, 0xFF])?;
    recorder.clear_texture(0, 0)?;
    recorder.present_texture(0, present, true)
}

/// A single note on voice 0, released after [`NOTE_SAMPLES`] and followed
/// by a write to `done`.
pub fn record_spu_phrase(
    recorder: &mut Recorder<'_, Spu>,
    done: &EffectFlag<'_>,
) -> Result<(), BufferFull> {
    recorder.reset_sample_counter(0)?;
    recorder.oscillator_reset(0)?;
    recorder.oscillator_set_waveform(0, Waveform::Sin)?;
    recorder.envelope_set_attack(0, 480)?;
    recorder.envelope_set_decay(0, 960)?;
    recorder.envelope_set_sustain(0, 0x4000)?;
    recorder.envelope_set_release(0, 2_400)?;
    recorder.set_mix(MixChannel::left(0), 0x3000)?;
    recorder.set_mix(MixChannel::right(0), 0x3000)?;
    recorder.note_on(0, 440)?;
    recorder.envelope_on(0)?;
    recorder.relative_wait(NOTE_SAMPLES)?;
    recorder.envelope_off(0)?;
    recorder.relative_wait(NOTE_SAMPLES / 2)?;
    recorder.write_flag(done, true)?;
    recorder.stop()
}

/// Wait for `in_flight`'s fence and take its region back.
///
/// If the wait stalls, a list the machine dropped at submission still
/// yields its region through [`SimMachine::recover`]. One that stays queued
/// is dropped, which leaks its region.
pub fn reclaim<'a, C: Coprocessor>(
    machine: &SimMachine,
    in_flight: InFlight<'a, '_, C>,
    wait: &mut SimWait<'_>,
) -> Result<OwnedRegion<'a>, SimError> {
    let (in_flight, e) = match in_flight.reclaim(wait) {
        Ok(region) => return Ok(region),
        Err(stalled) => stalled,
    };
    match machine.recover(in_flight) {
        Ok(region) => log::warn!("recovered {} bytes of a dropped list", region.capacity()),
        Err(in_flight) => log::error!("abandoning {:?}", in_flight),
    }
    Err(e)
}

/// Run `demo` on `machine` with lists recorded into regions of
/// `region_size` bytes.
///
/// # Errors
///
/// Fails on the first list that does not fit, is rejected or stalls.
pub fn run(machine: &SimMachine, demo: Demo, region_size: usize) -> Result<DemoReport, SimError> {
    let mut report = DemoReport::default();
    if matches!(demo, Demo::Gpu | Demo::All) {
        run_gpu(machine, region_size, &mut report)?;
    }
    if matches!(demo, Demo::Spu | Demo::All) {
        run_spu(machine, region_size, &mut report)?;
    }
    report.trace = machine.take_trace();
    Ok(report)
}

fn run_gpu(machine: &SimMachine, region_size: usize, report: &mut DemoReport) -> Result<(), SimError> {
    let memory = machine.memory();
    let mut hw = machine.hardware();
    let fence: &CompletionCell = memory.alloc_cell()?;
    let present = EffectFlag::arm_present(memory.alloc_cell()?, &hw)?;
    let mut region = OwnedRegion::new(memory.alloc_region(region_size)?);

    for frame in 0..FRAMES {
        let mut recorder = Recorder::<Gpu>::new(region)?;
        record_gpu_frame(&mut recorder, &present, frame)?;
        let list = recorder.finish();
        log::info!("frame {}: {} byte list", frame, list.len());

        let in_flight = hw
            .submit(GpuQueue, list, fence)
            .map_err(|failure| SimError::from(failure.into_parts().0))?;
        let mut wait = SimWait::new(machine);
        region = reclaim(machine, in_flight, &mut wait)?;
        present.wait(&mut wait)?;
        present.rearm();

        report.lists += 1;
        report.waits += wait.waits();
    }

    if hw.interrupt_pending(Interrupt::Present)? {
        hw.clear_interrupt(Interrupt::Present)?;
    }
    Ok(())
}

fn run_spu(machine: &SimMachine, region_size: usize, report: &mut DemoReport) -> Result<(), SimError> {
    let memory = machine.memory();
    let mut hw = machine.hardware();
    hw.set_spu_sample_rate(SampleRate::Rate48k)?;
    hw.start_spu()?;
    hw.enable_interrupt(Interrupt::Spu, true)?;

    let fence = memory.alloc_cell()?;
    let done = EffectFlag::arm(memory.alloc_cell()?, &hw, PHRASE_DONE)?;
    let mut recorder = Recorder::<Spu>::new(memory.alloc_region(region_size)?)?;
    record_spu_phrase(&mut recorder, &done)?;
    let list = recorder.finish();

    // A code latched by an earlier submission would be blamed on this list.
    hw.check_spu_submission()?;
    let in_flight = hw
        .submit(SpuQueue::Queue0, list, fence)
        .map_err(|failure| SimError::from(failure.into_parts().0))?;

    let mut wait = SimWait::new(machine);
    let reclaimed = reclaim(machine, in_flight, &mut wait);
    hw.check_spu_submission()?;
    let region = reclaimed?;
    done.wait(&mut wait)?;
    log::info!(
        "phrase done at sample {}, region of {} bytes back",
        hw.spu_sample_counter()?,
        region.capacity()
    );

    if hw.interrupt_pending(Interrupt::Spu)? {
        hw.clear_interrupt(Interrupt::Spu)?;
    }
    hw.stop_spu()?;
    report.lists += 1;
    report.waits += wait.waits();
    Ok(())
}
