// ============================================
// Threaded Data Requester - Фоновые задачи + продолжения
// ============================================
//
// Генерация идёт в пуле rayon, результат возвращается через mpsc
// в виде продолжения. Продолжения выполняются только в потоке владельца
// (take_completed / wait_next), поэтому состояние S не нужно синхронизировать.

use std::cell::Cell;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{channel, Receiver, Sender};

/// Продолжение: применяется к состоянию владельца, может ставить новые задачи
pub type Callback<S> = Box<dyn FnOnce(&mut S, &ThreadedDataRequester<S>) + Send>;

/// Ошибки создания пула
#[derive(Debug)]
pub enum RequesterError {
    Pool(String),
}

impl From<rayon::ThreadPoolBuildError> for RequesterError {
    fn from(e: rayon::ThreadPoolBuildError) -> Self {
        RequesterError::Pool(e.to_string())
    }
}

impl fmt::Display for RequesterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequesterError::Pool(e) => write!(f, "failed to build worker pool: {}", e),
        }
    }
}

impl std::error::Error for RequesterError {}

/// Планировщик фоновой генерации
pub struct ThreadedDataRequester<S: 'static> {
    pool: rayon::ThreadPool,
    result_tx: Sender<Callback<S>>,
    result_rx: Receiver<Callback<S>>,
    in_flight: Cell<usize>,
}

impl<S: 'static> ThreadedDataRequester<S> {
    /// threads = 0: по числу ядер
    pub fn new(threads: usize) -> Result<Self, RequesterError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("terrain-worker-{}", i))
            .build()?;
        let (result_tx, result_rx) = channel();

        log::debug!("terrain worker pool: {} threads", pool.current_num_threads());

        Ok(Self {
            pool,
            result_tx,
            result_rx,
            in_flight: Cell::new(0),
        })
    }

    /// Поставить задачу: generate в пуле, on_complete потом в потоке владельца
    pub fn request_data<T, G, C>(&self, generate: G, on_complete: C)
    where
        T: Send + 'static,
        G: FnOnce() -> T + Send + 'static,
        C: FnOnce(T, &mut S, &Self) + Send + 'static,
    {
        let tx = self.result_tx.clone();
        self.in_flight.set(self.in_flight.get() + 1);

        self.pool.spawn(move || {
            let callback: Callback<S> = match panic::catch_unwind(AssertUnwindSafe(generate)) {
                Ok(data) => Box::new(move |state: &mut S, requester: &Self| {
                    on_complete(data, state, requester)
                }),
                Err(_) => {
                    log::error!("terrain generation task panicked, result dropped");
                    Box::new(|_: &mut S, _: &Self| {})
                }
            };
            // Получатель живёт вместе с владельцем; после drop результат не нужен
            let _ = tx.send(callback);
        });
    }

    /// Задач в работе (включая готовые, но ещё не забранные)
    pub fn in_flight(&self) -> usize {
        self.in_flight.get()
    }

    fn mark_received(&self) {
        self.in_flight.set(self.in_flight.get().saturating_sub(1));
    }

    /// Все готовые продолжения без блокировки
    pub fn take_completed(&self) -> Vec<Callback<S>> {
        let completed: Vec<Callback<S>> = self.result_rx.try_iter().collect();
        for _ in &completed {
            self.mark_received();
        }
        completed
    }

    /// Ждать следующее продолжение; None если задач нет
    pub fn wait_next(&self) -> Option<Callback<S>> {
        if self.in_flight.get() == 0 {
            return None;
        }
        let callback = self.result_rx.recv().ok()?;
        self.mark_received();
        Some(callback)
    }

    /// Выполнить все готовые продолжения, вернуть их число
    pub fn process_completed(&self, state: &mut S) -> usize {
        let completed = self.take_completed();
        let count = completed.len();
        for callback in completed {
            callback(state, self);
        }
        count
    }

    /// Выполнять продолжения, пока не закончатся все задачи (включая порождённые)
    pub fn flush(&self, state: &mut S) -> usize {
        let mut count = 0;
        while let Some(callback) = self.wait_next() {
            callback(state, self);
            count += 1;
        }
        count
    }
}
