use rvfm_core::registers::components::submission_error_e::SubmissionErrorE;
use rvfm_core::{
    DecodeError, EffectFlag, Gpu, GpuCommand, GpuQueue, Interrupt, RegisterBus, Recorder, Spu,
    SpuCommand, SpuQueue,
};
use rvfm_sim::demo::{self, Demo};
use rvfm_sim::{QueueId, SimConfig, SimError, SimMachine, SimWait, TraceEvent};

const SPU_QUEUE0_PORT: u32 = 0x8004_0010;
const SPU_SUBMISSION_ERROR: u32 = 0x8004_000C;

fn machine() -> SimMachine {
    SimMachine::new(SimConfig::default()).unwrap()
}

fn machine_with(config: SimConfig) -> SimMachine {
    SimMachine::new(config).unwrap()
}

fn write_port(machine: &SimMachine, addr: u32, value: u32) {
    let mut bus = machine;
    bus.write_register(addr, value).unwrap();
}

fn read_reg(machine: &SimMachine, addr: u32) -> u32 {
    let mut bus = machine;
    bus.read_register(addr).unwrap()
}

// ============================================================================
// Submission and reclamation
// ============================================================================

#[test]
fn test_gpu_list_is_taken_and_region_reclaimed() {
    let machine = machine();
    let memory = machine.memory();
    let mut hw = machine.hardware();
    let fence = memory.alloc_cell().unwrap();
    let region = memory.alloc_region(64).unwrap();

    let mut recorder = Recorder::<Gpu>::new(region).unwrap();
    recorder.clear_texture(1, 0).unwrap();
    let list = recorder.finish();
    let in_flight = hw.submit(GpuQueue, list, fence).unwrap();

    assert_eq!(machine.pending_lists(), 1);
    assert!(!in_flight.is_complete(), "nothing taken before the machine runs");
    let in_flight = in_flight.try_reclaim().unwrap_err();

    assert_eq!(machine.step(), 1);
    assert_eq!(fence.load(), 1);
    let region = in_flight.try_reclaim().unwrap();
    assert_eq!(region.capacity(), 52);

    let trace = machine.trace();
    assert!(matches!(
        trace[0],
        TraceEvent::Accepted {
            queue: QueueId::Gpu,
            len: 4,
            ..
        }
    ));
    assert_eq!(
        trace[1],
        TraceEvent::Gpu {
            header: in_flight_header(&trace),
            command: GpuCommand::ClearTexture {
                texture: 1,
                sampler: 0
            }
        }
    );
}

fn in_flight_header(trace: &[TraceEvent]) -> u32 {
    match trace[0] {
        TraceEvent::Accepted { header, .. } => header,
        ref other => panic!("expected an accepted list, got {other:?}"),
    }
}

#[test]
fn test_sim_wait_drives_reclaim() {
    let machine = machine();
    let memory = machine.memory();
    let mut hw = machine.hardware();
    let fence = memory.alloc_cell().unwrap();

    let mut recorder = Recorder::<Spu>::new(memory.alloc_region(32).unwrap()).unwrap();
    recorder.note_on(0, 440).unwrap();
    let in_flight = hw.submit(SpuQueue::Queue2, recorder.finish(), fence).unwrap();

    let mut wait = SimWait::new(&machine);
    let region = in_flight.reclaim(&mut wait).unwrap();
    assert_eq!(region.capacity(), 20);
    assert_eq!(wait.waits(), 1);
    assert_eq!(machine.pending_lists(), 0);
}

#[test]
fn test_reclaimed_region_records_again() {
    let machine = machine();
    let memory = machine.memory();
    let mut hw = machine.hardware();
    let fence = memory.alloc_cell().unwrap();
    let mut region = rvfm_core::OwnedRegion::new(memory.alloc_region(24).unwrap());

    for texture in 0..3 {
        let mut recorder = Recorder::<Gpu>::new(region).unwrap();
        recorder.clear_texture(texture, 0).unwrap();
        let in_flight = hw.submit(GpuQueue, recorder.finish(), fence).unwrap();
        let mut wait = SimWait::new(&machine);
        region = in_flight.reclaim(&mut wait).unwrap();
        assert_eq!(region.capacity(), 12);
    }
    let cleared: Vec<u8> = machine
        .trace()
        .iter()
        .filter_map(|e| match e {
            TraceEvent::Gpu {
                command: GpuCommand::ClearTexture { texture, .. },
                ..
            } => Some(*texture),
            _ => None,
        })
        .collect();
    assert_eq!(cleared, vec![0, 1, 2]);
}

// ============================================================================
// Effect flags and interrupts
// ============================================================================

#[test]
fn test_present_sets_flag_and_raises_interrupt() {
    let machine = machine();
    let memory = machine.memory();
    let mut hw = machine.hardware();
    let fence = memory.alloc_cell().unwrap();
    let present = EffectFlag::arm_present(memory.alloc_cell().unwrap(), &hw).unwrap();

    let mut recorder = Recorder::<Gpu>::new(memory.alloc_region(32).unwrap()).unwrap();
    recorder.present_texture(0, &present, true).unwrap();
    let in_flight = hw.submit(GpuQueue, recorder.finish(), fence).unwrap();

    assert!(!present.is_set());
    assert!(!hw.interrupt_pending(Interrupt::Present).unwrap());
    machine.step();

    assert!(present.is_set());
    assert_eq!(present.cell().load(), 1);
    assert!(hw.interrupt_pending(Interrupt::Present).unwrap());
    assert!(!hw.interrupt_pending(Interrupt::Gpu).unwrap());
    hw.clear_interrupt(Interrupt::Present).unwrap();
    assert!(!hw.interrupt_pending(Interrupt::Present).unwrap());
    in_flight.try_reclaim().unwrap();
}

#[test]
fn test_spu_write_flag_stores_value() {
    let machine = machine();
    let memory = machine.memory();
    let mut hw = machine.hardware();
    let fence = memory.alloc_cell().unwrap();
    let value = core::num::NonZeroU32::new(0xBEEF).unwrap();
    let flag = EffectFlag::arm(memory.alloc_cell().unwrap(), &hw, value).unwrap();

    let mut recorder = Recorder::<Spu>::new(memory.alloc_region(32).unwrap()).unwrap();
    recorder.write_flag(&flag, true).unwrap();
    let in_flight = hw.submit(SpuQueue::Queue1, recorder.finish(), fence).unwrap();

    let mut wait = SimWait::new(&machine);
    in_flight.reclaim(&mut wait).unwrap();
    flag.wait(&mut wait).unwrap();
    assert_eq!(flag.cell().load(), 0xBEEF);
    assert!(hw.interrupt_pending(Interrupt::Spu).unwrap());
}

#[test]
fn test_flag_outside_ram_is_reported() {
    let machine = machine();
    let memory = machine.memory();
    let mut hw = machine.hardware();
    let fence = memory.alloc_cell().unwrap();

    let mut recorder = Recorder::<Gpu>::new(memory.alloc_region(32).unwrap()).unwrap();
    recorder
        .record(&GpuCommand::WriteFlag {
            interrupt: false,
            address: 0x0700_0000,
            value: 5,
        })
        .unwrap();
    let in_flight = hw.submit(GpuQueue, recorder.finish(), fence).unwrap();
    machine.step();
    in_flight.try_reclaim().unwrap();

    assert!(machine.trace().contains(&TraceEvent::FlagFault {
        queue: QueueId::Gpu,
        address: 0x0700_0000
    }));
}

// ============================================================================
// SPU execution
// ============================================================================

#[test]
fn test_sample_counter_follows_waits() {
    let machine = machine();
    let memory = machine.memory();
    let mut hw = machine.hardware();
    let fence = memory.alloc_cell().unwrap();

    let mut recorder = Recorder::<Spu>::new(memory.alloc_region(64).unwrap()).unwrap();
    recorder.reset_sample_counter(100).unwrap();
    recorder.relative_wait(50).unwrap();
    recorder.wait_sample_counter(120).unwrap();
    let in_flight = hw.submit(SpuQueue::Queue0, recorder.finish(), fence).unwrap();
    machine.step();
    in_flight.try_reclaim().unwrap();

    assert_eq!(hw.spu_sample_counter().unwrap(), 150);
}

#[test]
fn test_stop_ends_the_list() {
    let machine = machine();
    let memory = machine.memory();
    let mut hw = machine.hardware();
    let fence = memory.alloc_cell().unwrap();
    let flag = EffectFlag::arm(
        memory.alloc_cell().unwrap(),
        &hw,
        core::num::NonZeroU32::MIN,
    )
    .unwrap();

    let mut recorder = Recorder::<Spu>::new(memory.alloc_region(64).unwrap()).unwrap();
    recorder.stop().unwrap();
    recorder.write_flag(&flag, false).unwrap();
    let in_flight = hw.submit(SpuQueue::Queue3, recorder.finish(), fence).unwrap();
    machine.step();
    in_flight.try_reclaim().unwrap();

    assert!(!flag.is_set());
    let spu: Vec<SpuCommand> = machine
        .trace()
        .iter()
        .filter_map(|e| match e {
            TraceEvent::Spu { command, .. } => Some(*command),
            _ => None,
        })
        .collect();
    assert_eq!(spu, vec![SpuCommand::Stop]);
}

#[test]
fn test_undecodable_list_is_traced() {
    let machine = machine();
    let memory = machine.memory();
    let mut hw = machine.hardware();
    let fence = memory.alloc_cell().unwrap();

    let mut recorder = Recorder::<Spu>::new(memory.alloc_region(32).unwrap()).unwrap();
    recorder.push_command(&[0xEE, 0x00]).unwrap();
    let in_flight = hw.submit(SpuQueue::Queue0, recorder.finish(), fence).unwrap();
    machine.step();
    in_flight.try_reclaim().unwrap();

    assert!(machine.trace().iter().any(|e| matches!(
        e,
        TraceEvent::DecodeFailed {
            error: DecodeError::UnknownOpcode {
                opcode: 0xEE,
                offset: 0
            },
            ..
        }
    )));
}

// ============================================================================
// Header validation
// ============================================================================

#[test]
fn test_header_outside_ram_latches_code_1() {
    let machine = machine();
    write_port(&machine, SPU_QUEUE0_PORT, 0x0700_0000);
    machine.step();

    assert_eq!(read_reg(&machine, SPU_SUBMISSION_ERROR), 1);
    let mut hw = machine.hardware();
    assert!(matches!(
        hw.check_spu_submission().map_err(SimError::from),
        Err(SimError::Rejected(SubmissionErrorE::HeaderNotInRam))
    ));
    hw.clear_spu_submission_error().unwrap();
    assert!(hw.check_spu_submission().is_ok());
}

#[test]
fn test_overlong_list_latches_code_3() {
    let machine = machine();
    let memory = machine.memory();
    let region = memory.alloc_region(16).unwrap();
    region[4..8].copy_from_slice(&(rvfm_sim::MAX_LIST_LEN + 1).to_le_bytes());
    let header = memory.bus_address(region.as_ptr()).unwrap() + 4;

    write_port(&machine, SPU_QUEUE0_PORT, header);
    machine.step();
    assert_eq!(read_reg(&machine, SPU_SUBMISSION_ERROR), 3);
}

#[test]
fn test_list_past_ram_latches_code_2() {
    let machine = machine_with(SimConfig {
        ram_size: 0x1_0000,
        ..SimConfig::default()
    });
    let memory = machine.memory();
    let region = memory.alloc_region(16).unwrap();
    region[4..8].copy_from_slice(&0x1_0000u32.to_le_bytes());
    let header = memory.bus_address(region.as_ptr()).unwrap() + 4;

    write_port(&machine, SPU_QUEUE0_PORT, header);
    machine.step();
    assert_eq!(read_reg(&machine, SPU_SUBMISSION_ERROR), 2);
    assert!(machine.trace().contains(&TraceEvent::Rejected {
        queue: QueueId::Spu(SpuQueue::Queue0),
        header,
        reason: SubmissionErrorE::ListNotInRam,
    }));
}

#[test]
fn test_gpu_rejection_is_not_latched() {
    let machine = machine();
    write_port(&machine, 0x8001_0000, 0x0700_0000);
    machine.step();
    assert_eq!(read_reg(&machine, SPU_SUBMISSION_ERROR), 0);
    assert!(matches!(
        machine.trace()[0],
        TraceEvent::Rejected {
            queue: QueueId::Gpu,
            reason: SubmissionErrorE::HeaderNotInRam,
            ..
        }
    ));
}

#[test]
fn test_full_queue_latches_code_4_and_stalls() {
    let machine = machine_with(SimConfig {
        queue_depth: 1,
        stall_limit: 3,
        ..SimConfig::default()
    });
    let memory = machine.memory();
    let mut hw = machine.hardware();

    let first_fence = memory.alloc_cell().unwrap();
    let mut recorder = Recorder::<Spu>::new(memory.alloc_region(32).unwrap()).unwrap();
    recorder.stop().unwrap();
    let first = hw.submit(SpuQueue::Queue0, recorder.finish(), first_fence).unwrap();

    let second_fence = memory.alloc_cell().unwrap();
    let mut recorder = Recorder::<Spu>::new(memory.alloc_region(32).unwrap()).unwrap();
    recorder.stop().unwrap();
    let second = hw.submit(SpuQueue::Queue0, recorder.finish(), second_fence).unwrap();

    assert!(matches!(
        hw.check_spu_submission().map_err(SimError::from),
        Err(SimError::Rejected(SubmissionErrorE::QueueFull))
    ));

    let mut wait = SimWait::new(&machine);
    demo::reclaim(&machine, first, &mut wait).unwrap();
    // The dropped list's fence is never set.
    let err = demo::reclaim(&machine, second, &mut wait).unwrap_err();
    assert!(matches!(err, SimError::Stalled { .. }));
    assert!(!second_fence.is_signaled());
}

#[test]
fn test_list_dropped_by_full_queue_is_recovered() {
    let machine = machine_with(SimConfig {
        queue_depth: 1,
        ..SimConfig::default()
    });
    let memory = machine.memory();
    let mut hw = machine.hardware();

    let first_fence = memory.alloc_cell().unwrap();
    let mut recorder = Recorder::<Spu>::new(memory.alloc_region(32).unwrap()).unwrap();
    recorder.stop().unwrap();
    let first = hw.submit(SpuQueue::Queue1, recorder.finish(), first_fence).unwrap();

    let second_fence = memory.alloc_cell().unwrap();
    let mut recorder = Recorder::<Spu>::new(memory.alloc_region(48).unwrap()).unwrap();
    let capacity = recorder.capacity();
    recorder.stop().unwrap();
    let second = hw.submit(SpuQueue::Queue1, recorder.finish(), second_fence).unwrap();
    assert!(hw.check_spu_submission().is_err());

    // Still queued: handed back untouched.
    let first = machine.recover(first).unwrap_err();
    let region = machine.recover(second).unwrap();
    assert_eq!(region.capacity(), capacity);
    assert!(!second_fence.is_signaled());

    let recorder = Recorder::<Spu>::new(region).unwrap();
    assert_eq!(recorder.capacity(), capacity);

    assert_eq!(machine.step(), 1);
    assert!(machine.recover(first).is_ok());
}

#[test]
fn test_list_rejected_at_fetch_is_recovered() {
    let machine = machine_with(SimConfig {
        max_list_len: 4,
        ..SimConfig::default()
    });
    let memory = machine.memory();
    let mut hw = machine.hardware();
    let fence = memory.alloc_cell().unwrap();

    let mut recorder = Recorder::<Spu>::new(memory.alloc_region(64).unwrap()).unwrap();
    recorder.note_on(0, 440).unwrap();
    recorder.relative_wait(100).unwrap();
    let in_flight = hw.submit(SpuQueue::Queue0, recorder.finish(), fence).unwrap();
    hw.check_spu_submission().unwrap();

    assert_eq!(machine.run_until_idle(), 1);
    assert!(matches!(
        hw.check_spu_submission().map_err(SimError::from),
        Err(SimError::Rejected(SubmissionErrorE::ListTooLong))
    ));
    assert!(!fence.is_signaled());
    let region = machine.recover(in_flight).unwrap();
    assert_eq!(region.len(), 64);
}

#[test]
fn test_stale_submission_error_fails_spu_demo() {
    let machine = machine();
    write_port(&machine, SPU_SUBMISSION_ERROR, 4);

    let err = demo::run(&machine, Demo::Spu, 256).unwrap_err();
    assert!(matches!(err, SimError::Rejected(SubmissionErrorE::QueueFull)));
    assert_eq!(machine.pending_lists(), 0);

    let mut hw = machine.hardware();
    hw.clear_spu_submission_error().unwrap();
    let report = demo::run(&machine, Demo::Spu, 256).unwrap();
    assert_eq!(report.lists, 1);
}

// ============================================================================
// Register access
// ============================================================================

#[test]
fn test_register_access_modes_are_enforced() {
    let machine = machine();
    let mut bus = &machine;
    assert!(matches!(
        bus.read_register(0x8001_0000),
        Err(SimError::WriteOnlyRegister { addr: 0x8001_0000 })
    ));
    assert!(matches!(
        bus.write_register(0x8004_0004, 1),
        Err(SimError::ReadOnlyRegister { addr: 0x8004_0004 })
    ));
    assert!(matches!(
        bus.read_register(0x8005_0000),
        Err(SimError::UnmappedRegister { addr: 0x8005_0000 })
    ));
}

#[test]
fn test_spu_control_registers_hold_values() {
    let machine = machine();
    let mut hw = machine.hardware();
    assert!(!hw.spu_running().unwrap());
    hw.start_spu().unwrap();
    assert!(hw.spu_running().unwrap());
    hw.set_spu_sample_rate(rvfm_core::SampleRate::Rate32k).unwrap();
    assert_eq!(read_reg(&machine, 0x8004_0008), 1);
}

#[test]
fn test_foreign_pointer_fails_submission() {
    let machine = machine();
    let mut hw = machine.hardware();
    let fence = machine.memory().alloc_cell().unwrap();
    let mut host = [0u8; 32];

    let mut recorder = Recorder::<Gpu>::new(&mut host).unwrap();
    recorder.clear_texture(0, 0).unwrap();
    let failure = hw.submit(GpuQueue, recorder.finish(), fence).unwrap_err();
    let (error, list) = failure.into_parts();
    assert!(matches!(
        SimError::from(error),
        SimError::NotInRam { .. }
    ));
    assert_eq!(list.len(), 4);
    assert_eq!(machine.pending_lists(), 0);
}

// ============================================================================
// Demos
// ============================================================================

#[test]
fn test_all_demo_completes() {
    let machine = machine();
    let report = demo::run(&machine, Demo::All, 256).unwrap();
    assert_eq!(report.lists, 3);
    let presents = report
        .trace
        .iter()
        .filter(|e| {
            matches!(
                e,
                TraceEvent::FlagWritten {
                    interrupt: Some(Interrupt::Present),
                    ..
                }
            )
        })
        .count();
    assert_eq!(presents, 2);
    assert!(report.trace.iter().any(|e| matches!(
        e,
        TraceEvent::FlagWritten {
            value,
            interrupt: Some(Interrupt::Spu),
            ..
        } if *value == demo::PHRASE_DONE.get()
    )));
}

#[test]
fn test_demo_region_too_small_fails_cleanly() {
    let machine = machine();
    let err = demo::run(&machine, Demo::Spu, 24).unwrap_err();
    assert!(matches!(err, SimError::BufferFull(_)));
}
