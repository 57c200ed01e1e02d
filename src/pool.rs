//! Fixed set of worker threads fed through one job channel.
//!
//! The listener hands every accepted connection to the pool. A worker that
//! finishes picks up the next queued connection.

use std::sync::{mpsc, Arc, Mutex};
use std::thread;

use crate::error::{Error, Result};

type Job = Box<dyn FnOnce() + Send + 'static>;

pub struct ThreadPool {
    workers: Vec<Worker>,
    sender: Option<mpsc::Sender<Job>>,
}

struct Worker {
    id: usize,
    thread: Option<thread::JoinHandle<()>>,
}

impl Worker {
    fn spawn(id: usize, receiver: Arc<Mutex<mpsc::Receiver<Job>>>) -> Worker {
        let thread = thread::spawn(move || loop {
            let job = match receiver.lock() {
                Ok(receiver) => receiver.recv(),
                Err(_) => {
                    log::warn!("Worker {id}: job queue poisoned, stopping");
                    break;
                }
            };

            match job {
                Ok(job) => {
                    log::debug!("Worker {id} got a job");
                    job();
                }
                // sender dropped: pool is shutting down
                Err(_) => break,
            }
        });

        Worker {
            id,
            thread: Some(thread),
        }
    }
}

impl ThreadPool {
    /// Start `size` workers.
    ///
    /// # Errors
    ///
    /// [`Error::Pool`] if `size` is 0.
    pub fn build(size: usize) -> Result<ThreadPool> {
        if size == 0 {
            return Err(Error::Pool("can't build a pool with 0 workers".to_string()));
        }

        let (sender, receiver) = mpsc::channel();
        let receiver = Arc::new(Mutex::new(receiver));
        let workers = (0..size)
            .map(|id| Worker::spawn(id, Arc::clone(&receiver)))
            .collect();

        Ok(ThreadPool {
            workers,
            sender: Some(sender),
        })
    }

    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Queue `f` for the next free worker.
    pub fn execute<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let sender = self
            .sender
            .as_ref()
            .ok_or_else(|| Error::Pool("job channel is closed".to_string()))?;
        sender
            .send(Box::new(f))
            .map_err(|_| Error::Pool("no worker is listening".to_string()))
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        drop(self.sender.take());

        for worker in &mut self.workers {
            if let Some(thread) = worker.thread.take() {
                if thread.join().is_err() {
                    log::error!("Worker {} panicked", worker.id);
                }
            }
        }
        log::debug!("Worker pool shut down");
    }
}
