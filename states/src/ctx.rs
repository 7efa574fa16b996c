//! The state context: registry, dependency tracking, and the frame loop
//! hooks.
//!
//! A [`StateCtx`] lives on the UI thread and owns every registered state,
//! compute, and command. The embedding loop calls [`StateCtx::sync_computes`]
//! at the top of each frame to apply results that arrived from background
//! tasks, and [`StateCtx::run_computed`] at the bottom to flush enqueued
//! commands and re-derive dirty computes in dependency order.
//!
//! Mutations made through [`StateCtx::update`] mark dependent computes dirty;
//! [`StateCtx::state_mut`] is the untracked escape hatch for state nothing
//! derives from.

use std::any::TypeId;
use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::graph::DependencyGraph;
use crate::runtime;
use crate::snapshot::{ComputeSnapshot, StateSnapshot};
use crate::updater::{Envelope, Waker};
use crate::{
    Command, CommandSnapshot, Compute, Dep, LatestOnlyUpdater, State, StateError, StateSyncStatus,
    TaskHandle, TaskId, Updater,
};

/// Upper bound on re-derivation passes within one `run_computed` call.
/// Chains settle in (depth) passes; hitting the bound means a compute keeps
/// dirtying itself.
const MAX_SETTLE_PASSES: usize = 64;

pub(crate) struct ComputeSlot {
    pub(crate) compute: Box<dyn Compute>,
    pub(crate) status: StateSyncStatus,
}

struct CommandSlot {
    command: Box<dyn Command>,
    name: &'static str,
}

/// Owner of all application state. See the module docs for the frame
/// protocol.
pub struct StateCtx {
    states: BTreeMap<TypeId, Box<dyn State>>,
    computes: BTreeMap<TypeId, ComputeSlot>,
    commands: BTreeMap<TypeId, CommandSlot>,
    graph: DependencyGraph,
    tx: flume::Sender<Envelope>,
    rx: flume::Receiver<Envelope>,
    tasks: BTreeMap<TypeId, TaskHandle>,
    generations: BTreeMap<TypeId, u64>,
    queued: VecDeque<TypeId>,
    waker: Option<Waker>,
}

impl Default for StateCtx {
    fn default() -> Self {
        Self::new()
    }
}

impl StateCtx {
    pub fn new() -> Self {
        let (tx, rx) = flume::unbounded();
        Self {
            states: BTreeMap::new(),
            computes: BTreeMap::new(),
            commands: BTreeMap::new(),
            graph: DependencyGraph::new(),
            tx,
            rx,
            tasks: BTreeMap::new(),
            generations: BTreeMap::new(),
            queued: VecDeque::new(),
            waker: None,
        }
    }

    /// Install the repaint callback invoked whenever a background task
    /// publishes a result (typically `egui::Context::request_repaint`).
    pub fn set_waker(&mut self, waker: impl Fn() + Send + Sync + 'static) {
        self.waker = Some(std::sync::Arc::new(waker));
    }

    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------

    pub fn add_state<T: State>(&mut self, state: T) {
        if self
            .states
            .insert(TypeId::of::<T>(), Box::new(state))
            .is_some()
        {
            log::warn!("state re-registered: {}", std::any::type_name::<T>());
        }
    }

    /// Register a compute and its dependency edges.
    ///
    /// Panics on a cyclic or duplicated `deps()` declaration; both are
    /// programming errors that should fail loudly at startup.
    pub fn record_compute<T: Compute>(&mut self, compute: T) {
        let id = TypeId::of::<T>();
        let name = std::any::type_name::<T>();
        let (state_deps, compute_deps) = compute.deps();
        if let Err(err) = self.graph.record(id, name, state_deps, compute_deps) {
            panic!("record_compute({name}): {err}");
        }
        self.computes.insert(
            id,
            ComputeSlot {
                compute: Box::new(compute),
                status: StateSyncStatus::Init,
            },
        );
    }

    pub fn record_command<T: Command>(&mut self, command: T) {
        let name = std::any::type_name::<T>();
        if self
            .commands
            .insert(
                TypeId::of::<T>(),
                CommandSlot {
                    command: Box::new(command),
                    name,
                },
            )
            .is_some()
        {
            log::warn!("command re-registered: {name}");
        }
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// Read a registered state; panics when missing (wiring bug).
    pub fn state<T: State>(&self) -> &T {
        self.try_state::<T>().unwrap_or_else(|err| panic!("{err}"))
    }

    pub fn try_state<T: State>(&self) -> Result<&T, StateError> {
        self.states
            .get(&TypeId::of::<T>())
            .and_then(|state| state.as_any().downcast_ref::<T>())
            .ok_or_else(|| StateError::StateNotFound {
                id: TypeId::of::<T>(),
                context: std::any::type_name::<T>(),
            })
    }

    /// Mutable access without dependency tracking. Use [`StateCtx::update`]
    /// for anything a compute reads.
    pub fn state_mut<T: State>(&mut self) -> &mut T {
        self.states
            .get_mut(&TypeId::of::<T>())
            .and_then(|state| state.as_any_mut().downcast_mut::<T>())
            .unwrap_or_else(|| {
                panic!("state not registered: {}", std::any::type_name::<T>())
            })
    }

    /// The current cached value of a compute, if registered.
    pub fn cached<T: Compute>(&self) -> Option<&T> {
        self.try_cached::<T>().ok()
    }

    pub fn try_cached<T: Compute>(&self) -> Result<&T, StateError> {
        self.computes
            .get(&TypeId::of::<T>())
            .and_then(|slot| slot.compute.as_any().downcast_ref::<T>())
            .ok_or_else(|| StateError::ComputeNotFound {
                id: TypeId::of::<T>(),
                context: std::any::type_name::<T>(),
            })
    }

    // ------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------

    /// Mutate a state in place and mark every dependent compute dirty.
    pub fn update<T: State>(&mut self, mutate: impl FnOnce(&mut T)) {
        mutate(self.state_mut::<T>());
        self.mark_dependents_dirty(&TypeId::of::<T>());
    }

    pub fn mark_dirty(&mut self, id: &TypeId) {
        if let Some(slot) = self.computes.get_mut(id) {
            slot.status = StateSyncStatus::Dirty;
        }
    }

    pub fn mark_pending(&mut self, id: &TypeId) {
        if let Some(slot) = self.computes.get_mut(id) {
            slot.status = StateSyncStatus::Pending;
        }
    }

    pub fn mark_clean(&mut self, id: &TypeId) {
        if let Some(slot) = self.computes.get_mut(id) {
            slot.status = StateSyncStatus::Clean;
        }
    }

    fn mark_dependents_dirty(&mut self, id: &TypeId) {
        for dependent in self.graph.dependents_of(id) {
            self.mark_dirty(&dependent);
        }
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    /// Run a command now: snapshot, supersede the previous task of the same
    /// type, spawn the future on the background executor.
    pub fn dispatch<T: Command>(&mut self) {
        self.dispatch_by_id(TypeId::of::<T>());
    }

    /// Queue a command to be dispatched by the next [`StateCtx::run_computed`].
    /// Useful from deep inside widget code when the surrounding frame should
    /// finish reading state first.
    pub fn enqueue_command<T: Command>(&mut self) {
        self.queued.push_back(TypeId::of::<T>());
    }

    /// The live task handle for a command type, if one was dispatched.
    pub fn task_handle<T: Command>(&self) -> Option<&TaskHandle> {
        self.tasks.get(&TypeId::of::<T>())
    }

    /// A compute-flavored updater bound to this context's channel.
    pub fn updater(&self) -> Updater {
        Updater {
            tx: self.tx.clone(),
            waker: self.waker.clone(),
        }
    }

    /// A command-flavored updater for a fresh task generation. Dispatch uses
    /// this internally; tests use it to drive command futures by hand.
    pub fn task_updater<T: Command>(&mut self) -> LatestOnlyUpdater {
        self.task_updater_by_id(TypeId::of::<T>())
    }

    /// Snapshot every snapshottable state and compute for a command.
    pub fn command_snapshot(&self) -> CommandSnapshot {
        let mut states = StateSnapshot::default();
        for (id, state) in &self.states {
            if let Some(boxed) = state.snapshot() {
                states.insert(*id, boxed);
            }
        }
        let mut computes = ComputeSnapshot::default();
        for (id, slot) in &self.computes {
            if let Some(boxed) = slot.compute.snapshot() {
                computes.insert(*id, boxed);
            }
        }
        CommandSnapshot::new(states, computes)
    }

    fn task_updater_by_id(&mut self, id: TypeId) -> LatestOnlyUpdater {
        let generation = self.generations.entry(id).or_insert(0);
        *generation += 1;
        LatestOnlyUpdater {
            task: TaskId::new(id, *generation),
            tx: self.tx.clone(),
            waker: self.waker.clone(),
        }
    }

    fn dispatch_by_id(&mut self, id: TypeId) {
        let Some(name) = self.commands.get(&id).map(|slot| slot.name) else {
            log::error!("dispatch: command not recorded");
            return;
        };
        let updater = self.task_updater_by_id(id);
        log::info!(
            "dispatching {name} (generation {})",
            updater.task_id().generation()
        );
        let handle = TaskHandle::new(updater.task_id());
        if let Some(previous) = self.tasks.insert(id, handle.clone()) {
            previous.cancel();
        }
        let snapshot = self.command_snapshot();
        let Some(slot) = self.commands.get(&id) else {
            return;
        };
        let future = slot.command.run(snapshot, updater, handle.cancel_token());
        runtime::spawn(future);
    }

    // ------------------------------------------------------------------
    // Frame protocol
    // ------------------------------------------------------------------

    /// Apply every result waiting on the channel. Results stamped with a
    /// superseded task generation are discarded; everything else replaces its
    /// slot and marks dependents dirty.
    pub fn sync_computes(&mut self) {
        while let Ok(envelope) = self.rx.try_recv() {
            if let Some(task) = envelope.task {
                let current = self
                    .generations
                    .get(&task.type_id())
                    .copied()
                    .unwrap_or(0);
                if current > task.generation() {
                    log::info!("discarding superseded result for {}", envelope.type_name);
                    continue;
                }
            }
            self.apply(envelope);
        }
    }

    /// Flush enqueued commands, then re-derive dirty computes until the graph
    /// settles. Each compute runs after its compute dependencies within a
    /// pass, and published values are applied immediately so downstream
    /// computes read fresh inputs.
    pub fn run_computed(&mut self) {
        while let Some(id) = self.queued.pop_front() {
            self.dispatch_by_id(id);
        }

        for _ in 0..MAX_SETTLE_PASSES {
            let dirty: BTreeSet<TypeId> = self
                .computes
                .iter()
                .filter(|(_, slot)| slot.status.is_stale())
                .map(|(id, _)| *id)
                .collect();
            if dirty.is_empty() {
                return;
            }
            let order = self.graph.order(&dirty);
            for id in &order {
                {
                    let Some(slot) = self.computes.get(id) else {
                        continue;
                    };
                    let updater = self.updater();
                    let dep = Dep::new(&self.states, &self.computes);
                    slot.compute.compute(dep, updater);
                }
                self.mark_pending(id);
                self.sync_computes();
            }
        }
        log::error!("computes did not settle after {MAX_SETTLE_PASSES} passes");
    }

    fn apply(&mut self, envelope: Envelope) {
        let id = envelope.type_id;
        if let Some(slot) = self.computes.get_mut(&id) {
            slot.compute.assign_box(envelope.value);
            if slot.status == StateSyncStatus::Pending {
                slot.status = StateSyncStatus::Clean;
            }
            self.mark_dependents_dirty(&id);
        } else if let Some(state) = self.states.get_mut(&id) {
            state.assign_box(envelope.value);
            self.mark_dependents_dirty(&id);
        } else {
            log::warn!("no registered slot for published {}", envelope.type_name);
        }
    }
}
