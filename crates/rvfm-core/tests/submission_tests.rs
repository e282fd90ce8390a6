//! Integration tests for submission, completion and reclamation against a
//! mock register bus.
//!
//! In-flight lists have their fence signalled before they are dropped,
//! except where a test covers dropping or abandoning an unsignalled list.

mod common;

use common::{make_hardware, MockStall, MockWait};
use rvfm_core::region::{HEADER_CELL_OFFSET, PAYLOAD_OFFSET};
use rvfm_core::registers::components::submission_error_e::SubmissionErrorE;
use rvfm_core::{
    CompletionCell, EffectFlag, Gpu, GpuQueue, Hart, Interrupt, Recorder, SampleRate, Spu,
    SpuQueue, SubmitError,
};

const GPU_SUBMIT: u32 = 0x8001_0000;
const SPU_RUN_MODE: u32 = 0x8004_0000;
const SPU_SAMPLE_COUNTER: u32 = 0x8004_0004;
const SPU_SAMPLE_RATE: u32 = 0x8004_0008;
const SPU_SUBMISSION_ERROR: u32 = 0x8004_000C;
const SPU_QUEUE_PORTS: [u32; 4] = [0x8004_0010, 0x8004_0014, 0x8004_0018, 0x8004_001C];

// ============================================================================
// Port tests
// ============================================================================

mod port_tests {
    use super::*;

    #[test]
    fn spu_queue_2_writes_only_its_own_port() {
        let (mut hw, bus) = make_hardware();
        let mut buf = [0u8; 32];
        let header = (buf.as_ptr() as usize as u32).wrapping_add(4);
        let mut recorder = Recorder::<Spu>::new(&mut buf).unwrap();
        recorder.note_on(0, 440).unwrap();
        let fence = CompletionCell::new();

        let in_flight = hw
            .submit(SpuQueue::Queue2, recorder.finish(), &fence)
            .expect("mock bus accepts the port write");

        assert_eq!(
            bus.get_writes(),
            vec![(0x8004_0018, header)],
            "exactly one write, to queue 2's port"
        );
        for (queue, port) in SPU_QUEUE_PORTS.iter().enumerate() {
            if queue != 2 {
                assert_eq!(bus.last_write_to(*port), None, "queue {queue} port touched");
            }
        }
        assert_eq!(in_flight.header_address(), header);
        assert_eq!(in_flight.len(), 4);

        fence.signal(1);
        in_flight.try_reclaim().unwrap();
    }

    #[test]
    fn every_spu_queue_has_its_own_port() {
        for (queue, port) in SpuQueue::ALL.into_iter().zip(SPU_QUEUE_PORTS) {
            let (mut hw, bus) = make_hardware();
            let mut buf = [0u8; 16];
            let mut recorder = Recorder::<Spu>::new(&mut buf).unwrap();
            recorder.stop().unwrap();
            let fence = CompletionCell::new();
            let in_flight = hw.submit(queue, recorder.finish(), &fence).unwrap();
            assert_eq!(bus.get_writes().len(), 1);
            assert_eq!(bus.get_writes()[0].0, port, "{queue:?}");
            fence.signal(1);
            drop(in_flight);
        }
    }

    #[test]
    fn gpu_list_goes_to_the_gpu_port() {
        let (mut hw, bus) = make_hardware();
        let mut buf = [0u8; 32];
        let mut recorder = Recorder::<Gpu>::new(&mut buf).unwrap();
        recorder.clear_texture(0, 0).unwrap();
        let fence = CompletionCell::new();
        let in_flight = hw.submit(GpuQueue, recorder.finish(), &fence).unwrap();

        assert_eq!(
            bus.last_write_to(GPU_SUBMIT),
            Some(in_flight.header_address())
        );
        fence.signal(1);
        in_flight.try_reclaim().unwrap();
    }
}

// ============================================================================
// Fence tests
// ============================================================================

mod fence_tests {
    use super::*;

    #[test]
    fn submit_resets_fence_and_stores_its_address() {
        let (mut hw, _bus) = make_hardware();
        let fence = CompletionCell::new();
        fence.signal(0xDEAD);
        let fence_address = hw.bus_address(fence.as_ptr()).unwrap();

        let mut buf = [0u8; 32];
        let mut recorder = Recorder::<Spu>::new(&mut buf).unwrap();
        recorder.relative_wait(10).unwrap();
        let in_flight = hw.submit(SpuQueue::Queue0, recorder.finish(), &fence).unwrap();

        assert_eq!(fence.load(), 0, "fence must be zeroed before the port write");
        assert!(!in_flight.is_complete());

        fence.signal(1);
        let region = in_flight.try_reclaim().unwrap();
        assert_eq!(
            &region.as_slice()[HEADER_CELL_OFFSET..PAYLOAD_OFFSET],
            &fence_address.to_le_bytes(),
            "header names the fence"
        );
    }

    #[test]
    fn completion_is_not_observed_before_the_consumer_writes() {
        let (mut hw, _bus) = make_hardware();
        let fence = CompletionCell::new();
        let mut buf = [0u8; 32];
        let mut recorder = Recorder::<Gpu>::new(&mut buf).unwrap();
        recorder.clear_texture(1, 1).unwrap();
        let in_flight = hw.submit(GpuQueue, recorder.finish(), &fence).unwrap();

        let mut wait = MockWait::signalling(&fence, 3, 1);
        let in_flight = in_flight
            .try_reclaim()
            .expect_err("nothing has signalled the fence yet");
        let region = in_flight.reclaim(&mut wait).unwrap();

        assert_eq!(wait.waits, 3, "completion seen only after the third wait");
        assert_eq!(fence.load(), 1);
        assert_eq!(region.len(), 32);
    }

    #[test]
    fn stalled_wait_keeps_the_list_in_flight() {
        let (mut hw, _bus) = make_hardware();
        let fence = CompletionCell::new();
        let mut buf = [0u8; 32];
        let mut recorder = Recorder::<Spu>::new(&mut buf).unwrap();
        recorder.stop().unwrap();
        let in_flight = hw.submit(SpuQueue::Queue1, recorder.finish(), &fence).unwrap();

        let mut wait = MockWait::giving_up(2);
        let (in_flight, MockStall) = in_flight
            .reclaim(&mut wait)
            .expect_err("wait strategy gives up");
        assert!(!in_flight.is_complete());

        fence.signal(1);
        assert!(in_flight.try_reclaim().is_ok());
    }

    #[test]
    fn effect_flag_and_fence_are_independent() {
        let (mut hw, _bus) = make_hardware();
        let fence = CompletionCell::new();
        let presented = CompletionCell::new();
        let flag = EffectFlag::arm_present(&presented, &hw).unwrap();

        let mut buf = [0u8; 32];
        let mut recorder = Recorder::<Gpu>::new(&mut buf).unwrap();
        recorder.present_texture(0, &flag, false).unwrap();
        let in_flight = hw.submit(GpuQueue, recorder.finish(), &fence).unwrap();

        fence.signal(1);
        assert!(in_flight.is_complete());
        assert!(!flag.is_set(), "list consumed does not mean presented");

        presented.signal(1);
        let mut wait = MockWait::new();
        flag.wait(&mut wait).unwrap();
        assert_eq!(wait.waits, 0);
        in_flight.try_reclaim().unwrap();
    }

    #[test]
    fn effect_flag_waits_for_its_own_value() {
        let (hw, _bus) = make_hardware();
        let cell = CompletionCell::new();
        cell.signal(9);
        let flag = EffectFlag::arm(&cell, &hw, core::num::NonZeroU32::new(2).unwrap()).unwrap();
        assert_eq!(cell.load(), 0, "arming resets the cell");

        cell.signal(1);
        assert!(!flag.is_set(), "a different non-zero value is not the effect");

        let mut wait = MockWait::signalling(&cell, 2, 2);
        flag.wait(&mut wait).unwrap();
        assert!(flag.is_set());

        flag.rearm();
        assert_eq!(cell.load(), 0);
    }
}

// ============================================================================
// Reclamation tests
// ============================================================================

mod reclaim_tests {
    use super::*;

    #[test]
    fn reclaimed_region_has_init_capacity() {
        let (mut hw, _bus) = make_hardware();
        let fence = CompletionCell::new();
        let mut buf = [0u8; 80];
        let base = buf.as_ptr();

        let mut recorder = Recorder::<Spu>::new(&mut buf).unwrap();
        let capacity = recorder.capacity();
        recorder.note_on(1, 220).unwrap();
        let in_flight = hw.submit(SpuQueue::Queue3, recorder.finish(), &fence).unwrap();
        fence.signal(1);

        let region = in_flight.reclaim(&mut MockWait::new()).unwrap();
        assert_eq!(region.as_ptr(), base);
        assert_eq!(region.capacity(), capacity);

        let recorder = Recorder::<Spu>::new(region).unwrap();
        assert_eq!(recorder.capacity(), capacity);
    }

    #[test]
    fn region_cycles_through_many_submissions() {
        let (mut hw, bus) = make_hardware();
        let fence = CompletionCell::new();
        let mut buf = [0u8; 48];
        let mut region = rvfm_core::OwnedRegion::from(&mut buf);

        for n in 0..4u16 {
            let mut recorder = Recorder::<Spu>::new(region).unwrap();
            recorder.note_on(0, 100 + n).unwrap();
            let in_flight = hw.submit(SpuQueue::Queue0, recorder.finish(), &fence).unwrap();
            let mut wait = MockWait::signalling(&fence, 1, 1);
            region = in_flight.reclaim(&mut wait).unwrap();
        }
        assert_eq!(bus.get_writes().len(), 4);
        assert_eq!(region.len(), 48);
    }

    #[test]
    fn dropping_an_unsignalled_list_returns() {
        let (mut hw, _bus) = make_hardware();
        let fence = CompletionCell::new();
        let mut buf = [0u8; 32];
        let mut recorder = Recorder::<Spu>::new(&mut buf).unwrap();
        recorder.stop().unwrap();
        let in_flight = hw.submit(SpuQueue::Queue0, recorder.finish(), &fence).unwrap();

        drop(in_flight);
        assert!(!fence.is_signaled());
    }

    #[test]
    fn abandoned_list_gives_back_its_region() {
        let (mut hw, bus) = make_hardware();
        bus.set_read_value(SPU_SUBMISSION_ERROR, 4);
        let fence = CompletionCell::new();
        let mut buf = [0u8; 40];
        let base = buf.as_ptr();

        let mut recorder = Recorder::<Spu>::new(&mut buf).unwrap();
        let capacity = recorder.capacity();
        recorder.note_on(2, 330).unwrap();
        let in_flight = hw.submit(SpuQueue::Queue2, recorder.finish(), &fence).unwrap();
        let err = hw.check_spu_submission().expect_err("queue full latched");
        assert_eq!(err.rejection(), Some(SubmissionErrorE::QueueFull));

        // The mock bus never hands lists to a coprocessor.
        let region = unsafe { in_flight.abandon() };
        assert_eq!(region.as_ptr(), base);
        assert_eq!(region.len(), 40);
        assert!(!fence.is_signaled());

        let recorder = Recorder::<Spu>::new(region).unwrap();
        assert_eq!(recorder.capacity(), capacity);
    }
}

// ============================================================================
// Failure tests
// ============================================================================

mod failure_tests {
    use super::*;

    #[test]
    fn failed_port_write_returns_the_list() {
        let (mut hw, bus) = make_hardware();
        bus.fail_writes(true);
        let fence = CompletionCell::new();
        let mut buf = [0u8; 32];
        let mut recorder = Recorder::<Spu>::new(&mut buf).unwrap();
        recorder.relative_wait(5000).unwrap();

        let failure = hw
            .submit(SpuQueue::Queue0, recorder.finish(), &fence)
            .expect_err("port write fails");
        assert!(matches!(failure.error(), SubmitError::Bus(_)));
        let list = failure.into_list();
        assert_eq!(list.payload(), &[0x0F, 0x88, 0x13, 0x00, 0x00]);

        bus.fail_writes(false);
        let in_flight = hw.submit(SpuQueue::Queue0, list, &fence).unwrap();
        fence.signal(1);
        in_flight.try_reclaim().unwrap();
    }

    #[test]
    fn failed_translation_writes_nothing() {
        let (mut hw, bus) = make_hardware();
        bus.fail_translation(true);
        let fence = CompletionCell::new();
        let mut buf = [0u8; 32];
        let recorder = Recorder::<Gpu>::new(&mut buf).unwrap();

        let (error, list) = hw
            .submit(GpuQueue, recorder.finish(), &fence)
            .expect_err("no bus address")
            .into_parts();
        assert!(matches!(error, SubmitError::Bus(_)));
        assert_eq!(list.header_completion_address(), 0);
        assert!(bus.get_writes().is_empty());
    }

    #[test]
    fn latched_submission_error_is_reported() {
        let (mut hw, bus) = make_hardware();
        hw.check_spu_submission().expect("no error latched");

        bus.set_read_value(SPU_SUBMISSION_ERROR, 4);
        let err = hw.check_spu_submission().expect_err("queue full latched");
        assert_eq!(err.rejection(), Some(SubmissionErrorE::QueueFull));

        hw.clear_spu_submission_error().unwrap();
        assert_eq!(bus.last_write_to(SPU_SUBMISSION_ERROR), Some(0));
    }

    #[test]
    fn unknown_submission_code_is_still_a_rejection() {
        let (mut hw, bus) = make_hardware();
        bus.set_read_value(SPU_SUBMISSION_ERROR, 0x42);
        let err = hw.check_spu_submission().unwrap_err();
        assert!(matches!(err, SubmitError::SubmissionRejected { .. }));
        assert_eq!(err.rejection(), None);
    }
}

// ============================================================================
// SPU and interrupt control tests
// ============================================================================

mod control_tests {
    use super::*;

    #[test]
    fn spu_run_control() {
        let (mut hw, bus) = make_hardware();
        hw.set_spu_sample_rate(SampleRate::Rate48k).unwrap();
        hw.start_spu().unwrap();
        assert_eq!(bus.last_write_to(SPU_SAMPLE_RATE), Some(3));
        assert_eq!(bus.last_write_to(SPU_RUN_MODE), Some(1));

        hw.stop_spu().unwrap();
        assert_eq!(bus.last_write_to(SPU_RUN_MODE), Some(0));

        bus.set_read_value(SPU_RUN_MODE, 1);
        bus.set_read_value(SPU_SAMPLE_COUNTER, 12_345);
        assert!(hw.spu_running().unwrap());
        assert_eq!(hw.spu_sample_counter().unwrap(), 12_345);
    }

    #[test]
    fn interrupt_routing() {
        let (mut hw, bus) = make_hardware();
        hw.enable_interrupt(Interrupt::Spu, true).unwrap();
        hw.set_interrupt_target(Interrupt::Spu, Hart::Hart2).unwrap();
        hw.clear_interrupt(Interrupt::Present).unwrap();

        assert_eq!(
            bus.get_writes(),
            vec![
                (0x8003_0030, 1),
                (0x8003_0034, 2),
                (0x8003_0018, 1),
            ]
        );

        bus.set_read_value(0x8003_0008, 1);
        assert!(hw.interrupt_pending(Interrupt::Gpu).unwrap());
        assert!(!hw.interrupt_pending(Interrupt::VSync).unwrap());
    }
}
