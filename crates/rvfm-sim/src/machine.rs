//! The simulated machine: RAM, the GPU queue and the four SPU queues.
//!
//! Submission ports enqueue header addresses. [`SimMachine::step`] plays the
//! coprocessors: it validates each queued header, copies the list out of
//! RAM, signals the list's fence and then executes the commands in order.
//! Only effects visible to the producer are modelled (completion cells,
//! interrupt pending bits, the SPU sample counter).

use core::cell::RefCell;
use core::ops::ControlFlow;

use heapless::Deque;
use rvfm_core::command_list::Commands;
use rvfm_core::{
    Coprocessor, EffectFlag, Gpu, GpuCommand, Hardware, InFlight, Interrupt, OwnedRegion,
    RegisterBus, RegisterFile, Spu, SpuCommand, SpuQueue,
};
use rvfm_registers::access::{Access, AccessMode};
use rvfm_registers::components::intc_regs::irq_target::IrqTargetReg;
use rvfm_registers::components::spu_regs::run_mode::RunModeReg;
use rvfm_registers::components::spu_regs::sample_rate::SampleRateReg;
use rvfm_registers::components::spu_regs::submission_error::SubmissionErrorReg;
use rvfm_registers::components::submission_error_e::SubmissionErrorE;
use rvfm_registers::reg::{Reg, Register};

use crate::config::{SimConfig, MAX_QUEUE_DEPTH};
use crate::error::SimError;
use crate::memory::SimMemory;
use crate::trace::{QueueId, TraceEvent};

type ListQueue = Deque<u32, MAX_QUEUE_DEPTH>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mapped {
    GpuSubmit,
    SpuRunMode,
    SpuSampleCounter,
    SpuSampleRate,
    SpuSubmissionError,
    SpuSubmit(SpuQueue),
    IrqEnable(Interrupt),
    IrqTarget(Interrupt),
    IrqPending(Interrupt),
}

#[derive(Debug, Clone, Copy)]
struct MapEntry {
    addr: u32,
    mode: AccessMode,
    mapped: Mapped,
}

fn entry<T: Register, A: Access>(mapped: Mapped, reg: Reg<T, A>) -> MapEntry {
    MapEntry {
        addr: reg.addr(),
        mode: reg.access(),
        mapped,
    }
}

fn register_map(regs: &RegisterFile) -> Vec<MapEntry> {
    let mut map = vec![
        entry(Mapped::GpuSubmit, regs.gpu.submit()),
        entry(Mapped::SpuRunMode, regs.spu.run_mode()),
        entry(Mapped::SpuSampleCounter, regs.spu.sample_counter()),
        entry(Mapped::SpuSampleRate, regs.spu.sample_rate()),
        entry(Mapped::SpuSubmissionError, regs.spu.submission_error()),
    ];
    for queue in SpuQueue::ALL {
        map.push(entry(Mapped::SpuSubmit(queue), regs.spu.submit(queue)));
    }
    for irq in Interrupt::ALL {
        map.push(entry(Mapped::IrqEnable(irq), regs.intc.enable(irq)));
        map.push(entry(Mapped::IrqTarget(irq), regs.intc.target(irq)));
        map.push(entry(Mapped::IrqPending(irq), regs.intc.pending(irq)));
    }
    map
}

#[derive(Debug, Default, Clone, Copy)]
struct IrqLine {
    enabled: bool,
    target: IrqTargetReg,
    pending: bool,
}

#[derive(Debug)]
struct State {
    gpu_queue: ListQueue,
    spu_queues: [ListQueue; 4],
    run_mode: RunModeReg,
    sample_rate: SampleRateReg,
    sample_counter: u32,
    submission_error: SubmissionErrorReg,
    irq: [IrqLine; 4],
    trace: Vec<TraceEvent>,
}

impl State {
    fn new() -> Self {
        Self {
            gpu_queue: Deque::new(),
            spu_queues: core::array::from_fn(|_| Deque::new()),
            run_mode: RunModeReg::default(),
            sample_rate: SampleRateReg::default(),
            sample_counter: 0,
            submission_error: SubmissionErrorReg::default(),
            irq: [IrqLine::default(); 4],
            trace: Vec::new(),
        }
    }

    fn queue_mut(&mut self, queue: QueueId) -> &mut ListQueue {
        match queue {
            QueueId::Gpu => &mut self.gpu_queue,
            QueueId::Spu(q) => &mut self.spu_queues[q.index()],
        }
    }

    fn latch(&mut self, queue: QueueId, reason: SubmissionErrorE) {
        // Only the SPU has a status register; GPU rejections are traced.
        if let QueueId::Spu(_) = queue {
            let mut status = SubmissionErrorReg::default();
            status.set_code(reason.bits());
            self.submission_error = status;
        }
    }
}

/// RAM, registers and coprocessor queues of one simulated machine.
///
/// Lists run synchronously inside [`SimMachine::step`]; nothing reads a
/// list between steps except through its queue.
pub struct SimMachine {
    config: SimConfig,
    regs: RegisterFile,
    map: Vec<MapEntry>,
    memory: SimMemory,
    state: RefCell<State>,
}

impl SimMachine {
    /// Build a machine with empty queues and zeroed RAM.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] if `config` fails validation.
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        config.validate()?;
        let regs = RegisterFile::rvfm();
        log::debug!(
            "simulated RAM {:#010x}..{:#010x}, queue depth {}",
            config.ram_base,
            config.ram_base as u64 + config.ram_size as u64,
            config.queue_depth
        );
        Ok(Self {
            map: register_map(&regs),
            memory: SimMemory::new(config.ram_base, config.ram_size),
            regs,
            config,
            state: RefCell::new(State::new()),
        })
    }

    /// The configuration the machine was built with.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Simulated RAM, for allocating regions and cells.
    pub fn memory(&self) -> &SimMemory {
        &self.memory
    }

    /// Register addresses the machine decodes.
    pub fn regs(&self) -> &RegisterFile {
        &self.regs
    }

    /// Hardware capability over this machine's register file.
    pub fn hardware(&self) -> Hardware<&SimMachine> {
        Hardware::new(self, self.regs)
    }

    /// Lists queued but not yet taken by a coprocessor.
    pub fn pending_lists(&self) -> usize {
        let state = self.state.borrow();
        state.gpu_queue.len() + state.spu_queues.iter().map(|q| q.len()).sum::<usize>()
    }

    /// Current value of the SPU sample counter.
    pub fn sample_counter(&self) -> u32 {
        self.state.borrow().sample_counter
    }

    /// Copy of the events recorded so far.
    pub fn trace(&self) -> Vec<TraceEvent> {
        self.state.borrow().trace.clone()
    }

    /// Drain the recorded events.
    pub fn take_trace(&self) -> Vec<TraceEvent> {
        core::mem::take(&mut self.state.borrow_mut().trace)
    }

    /// Take at most one list from each queue and run it to the end.
    ///
    /// Returns the number of lists taken.
    pub fn step(&self) -> usize {
        let mut taken = 0;
        if let Some(header) = self.pop(QueueId::Gpu) {
            self.run_gpu_list(header);
            taken += 1;
        }
        for queue in SpuQueue::ALL {
            if let Some(header) = self.pop(QueueId::Spu(queue)) {
                self.run_spu_list(queue, header);
                taken += 1;
            }
        }
        taken
    }

    /// Step until every queue is empty. Returns the number of lists taken.
    pub fn run_until_idle(&self) -> usize {
        let mut total = 0;
        loop {
            let taken = self.step();
            if taken == 0 {
                return total;
            }
            total += taken;
        }
    }

    /// Take back the region of a submitted list.
    ///
    /// Succeeds when the list's fence is set, or when no queue holds the
    /// list's header: the machine dropped it, either at a full queue or
    /// when `step` rejected its header, and will never read it. A list
    /// still queued is handed back unchanged.
    pub fn recover<'a, 'c, C: Coprocessor>(
        &self,
        in_flight: InFlight<'a, 'c, C>,
    ) -> Result<OwnedRegion<'a>, InFlight<'a, 'c, C>> {
        let in_flight = match in_flight.try_reclaim() {
            Ok(region) => return Ok(region),
            Err(in_flight) => in_flight,
        };
        if self.is_queued(in_flight.header_address()) {
            return Err(in_flight);
        }
        // SAFETY: lists are only read inside `step`, after being taken from
        // a queue, and an accepted list has its fence set first. A header in
        // no queue with a clear fence was dropped and is never read again.
        Ok(unsafe { in_flight.abandon() })
    }

    fn is_queued(&self, header: u32) -> bool {
        let state = self.state.borrow();
        state
            .gpu_queue
            .iter()
            .chain(state.spu_queues.iter().flat_map(|q| q.iter()))
            .any(|&h| h == header)
    }

    fn pop(&self, queue: QueueId) -> Option<u32> {
        self.state.borrow_mut().queue_mut(queue).pop_front()
    }

    fn record(&self, event: TraceEvent) {
        self.state.borrow_mut().trace.push(event);
    }

    fn enqueue(&self, queue: QueueId, header: u32) {
        let mut state = self.state.borrow_mut();
        let depth = self.config.queue_depth;
        let list_queue = state.queue_mut(queue);
        if list_queue.len() >= depth || list_queue.push_back(header).is_err() {
            log::warn!("[{}] queue full, dropping list {:#010x}", queue, header);
            state.latch(queue, SubmissionErrorE::QueueFull);
            state.trace.push(TraceEvent::Rejected {
                queue,
                header,
                reason: SubmissionErrorE::QueueFull,
            });
            return;
        }
        log::trace!("[{}] queued list {:#010x}", queue, header);
    }

    fn reject(&self, queue: QueueId, header: u32, reason: SubmissionErrorE) {
        log::warn!("[{}] rejected list {:#010x}: {:?}", queue, header, reason);
        let mut state = self.state.borrow_mut();
        state.latch(queue, reason);
        state.trace.push(TraceEvent::Rejected {
            queue,
            header,
            reason,
        });
    }

    /// Validate the header at `header`, copy its payload and signal its
    /// fence.
    fn fetch(&self, queue: QueueId, header: u32) -> Option<Vec<u8>> {
        let (Some(len), Some(fence)) = (
            self.memory.read_u32(header),
            self.memory.read_u32(header.wrapping_add(4)),
        ) else {
            self.reject(queue, header, SubmissionErrorE::HeaderNotInRam);
            return None;
        };
        if len > self.config.max_list_len {
            self.reject(queue, header, SubmissionErrorE::ListTooLong);
            return None;
        }
        let mut payload = vec![0u8; len as usize];
        if !self.memory.read(header.wrapping_add(8), &mut payload) {
            self.reject(queue, header, SubmissionErrorE::ListNotInRam);
            return None;
        }

        if fence != 0 && !self.memory.store_u32(fence, 1) {
            log::warn!("[{}] fence {:#010x} is not in RAM", queue, fence);
        }
        log::debug!("[{}] took {} byte list {:#010x}", queue, len, header);
        self.record(TraceEvent::Accepted {
            queue,
            header,
            len,
            fence,
        });
        Some(payload)
    }

    fn run_gpu_list(&self, header: u32) {
        let Some(payload) = self.fetch(QueueId::Gpu, header) else {
            return;
        };
        for command in Commands::<Gpu>::new(&payload) {
            match command {
                Ok(command) => {
                    self.record(TraceEvent::Gpu { header, command });
                    self.execute_gpu(&command);
                }
                Err(error) => self.decode_failed(QueueId::Gpu, header, error),
            }
        }
    }

    fn run_spu_list(&self, queue: SpuQueue, header: u32) {
        let Some(payload) = self.fetch(QueueId::Spu(queue), header) else {
            return;
        };
        for command in Commands::<Spu>::new(&payload) {
            match command {
                Ok(command) => {
                    self.record(TraceEvent::Spu {
                        queue,
                        header,
                        command,
                    });
                    if self.execute_spu(queue, &command).is_break() {
                        break;
                    }
                }
                Err(error) => self.decode_failed(QueueId::Spu(queue), header, error),
            }
        }
    }

    fn decode_failed(&self, queue: QueueId, header: u32, error: rvfm_core::DecodeError) {
        log::warn!("[{}] list {:#010x}: {}", queue, header, error);
        self.record(TraceEvent::DecodeFailed {
            queue,
            header,
            error,
        });
    }

    fn execute_gpu(&self, command: &GpuCommand) {
        match *command {
            GpuCommand::WriteFlag {
                interrupt,
                address,
                value,
            } => self.write_flag(QueueId::Gpu, address, value, interrupt.then_some(Interrupt::Gpu)),
            GpuCommand::PresentTexture {
                interrupt,
                completion_address,
                ..
            } => self.write_flag(
                QueueId::Gpu,
                completion_address,
                EffectFlag::PRESENTED.get(),
                interrupt.then_some(Interrupt::Present),
            ),
            _ => {}
        }
    }

    fn execute_spu(&self, queue: SpuQueue, command: &SpuCommand) -> ControlFlow<()> {
        match *command {
            SpuCommand::ResetSampleCounter(value) => {
                self.state.borrow_mut().sample_counter = value;
            }
            SpuCommand::WaitSampleCounter(value) => {
                let mut state = self.state.borrow_mut();
                state.sample_counter = state.sample_counter.max(value);
            }
            SpuCommand::RelativeWait(samples) => {
                let mut state = self.state.borrow_mut();
                state.sample_counter = state.sample_counter.wrapping_add(samples);
            }
            SpuCommand::WriteFlag {
                interrupt,
                address,
                value,
            } => self.write_flag(
                QueueId::Spu(queue),
                address,
                value,
                interrupt.then_some(Interrupt::Spu),
            ),
            SpuCommand::Stop => return ControlFlow::Break(()),
            _ => {}
        }
        ControlFlow::Continue(())
    }

    fn write_flag(&self, queue: QueueId, address: u32, value: u32, interrupt: Option<Interrupt>) {
        if address != 0 && !self.memory.store_u32(address, value) {
            log::warn!("[{}] flag write to {:#010x} dropped", queue, address);
            self.record(TraceEvent::FlagFault { queue, address });
            return;
        }
        let mut state = self.state.borrow_mut();
        if let Some(irq) = interrupt {
            let line = &mut state.irq[irq.bits() as usize];
            line.pending = true;
            if line.enabled {
                log::debug!("{:?} interrupt to {:?}", irq, line.target.hart());
            }
        }
        state.trace.push(TraceEvent::FlagWritten {
            queue,
            address,
            value,
            interrupt,
        });
    }

    fn lookup(&self, addr: u32) -> Result<MapEntry, SimError> {
        self.map
            .iter()
            .find(|e| e.addr == addr)
            .copied()
            .ok_or(SimError::UnmappedRegister { addr })
    }

    fn store_register(&self, addr: u32, value: u32) -> Result<(), SimError> {
        let entry = self.lookup(addr)?;
        if entry.mode == AccessMode::ReadOnly {
            return Err(SimError::ReadOnlyRegister { addr });
        }
        match entry.mapped {
            Mapped::GpuSubmit => self.enqueue(QueueId::Gpu, value),
            Mapped::SpuSubmit(queue) => self.enqueue(QueueId::Spu(queue), value),
            mapped => {
                let mut state = self.state.borrow_mut();
                match mapped {
                    Mapped::SpuRunMode => state.run_mode = RunModeReg::from_raw(value),
                    Mapped::SpuSampleRate => state.sample_rate = SampleRateReg::from_raw(value),
                    Mapped::SpuSubmissionError => {
                        state.submission_error = SubmissionErrorReg::from_raw(value)
                    }
                    Mapped::IrqEnable(irq) => state.irq[irq.bits() as usize].enabled = value & 1 != 0,
                    Mapped::IrqTarget(irq) => {
                        state.irq[irq.bits() as usize].target = IrqTargetReg::from_raw(value)
                    }
                    Mapped::IrqPending(irq) => {
                        if value & 1 != 0 {
                            state.irq[irq.bits() as usize].pending = false;
                        }
                    }
                    Mapped::GpuSubmit | Mapped::SpuSubmit(_) | Mapped::SpuSampleCounter => {}
                }
            }
        }
        Ok(())
    }

    fn load_register(&self, addr: u32) -> Result<u32, SimError> {
        let entry = self.lookup(addr)?;
        if entry.mode == AccessMode::WriteOnly {
            return Err(SimError::WriteOnlyRegister { addr });
        }
        let state = self.state.borrow();
        Ok(match entry.mapped {
            Mapped::SpuRunMode => state.run_mode.to_raw(),
            Mapped::SpuSampleCounter => state.sample_counter,
            Mapped::SpuSampleRate => state.sample_rate.to_raw(),
            Mapped::SpuSubmissionError => state.submission_error.to_raw(),
            Mapped::IrqEnable(irq) => state.irq[irq.bits() as usize].enabled as u32,
            Mapped::IrqTarget(irq) => state.irq[irq.bits() as usize].target.to_raw(),
            Mapped::IrqPending(irq) => state.irq[irq.bits() as usize].pending as u32,
            Mapped::GpuSubmit | Mapped::SpuSubmit(_) => 0,
        })
    }
}

impl RegisterBus for &SimMachine {
    type Error = SimError;

    fn write_register(&mut self, addr: u32, value: u32) -> Result<(), Self::Error> {
        self.store_register(addr, value)
    }

    fn read_register(&mut self, addr: u32) -> Result<u32, Self::Error> {
        self.load_register(addr)
    }

    fn bus_address(&self, ptr: *const u8) -> Result<u32, Self::Error> {
        self.memory.bus_address(ptr)
    }
}

impl core::fmt::Debug for SimMachine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SimMachine")
            .field("config", &self.config)
            .field("memory", &self.memory)
            .field("pending_lists", &self.pending_lists())
            .finish()
    }
}
