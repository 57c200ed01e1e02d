use std::io::{self, BufReader, Read};
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
use std::time::Duration;

use crate::config::ServeConfig;
use crate::error::{Error, Result};
use crate::http::{handle, Request, Response};
use crate::pool::ThreadPool;
use crate::rank::Analysis;

/// Unread request bytes discarded after an early error response.
const MAX_DRAIN_BYTES: u64 = 1 << 20;

/// Limits applied to every connection.
#[derive(Debug, Clone, Copy)]
struct Limits {
    max_body_bytes: usize,
    read_timeout: Option<Duration>,
}

pub struct Server {
    listener: TcpListener,
    pool: ThreadPool,
    analysis: Analysis,
    limits: Limits,
}

impl Server {
    /// Bind the listening socket and start the workers.
    pub fn bind(config: &ServeConfig) -> Result<Server> {
        let listener = TcpListener::bind(config.address())?;
        let pool = ThreadPool::build(config.workers)?;

        Ok(Server {
            listener,
            pool,
            analysis: config.analysis,
            limits: Limits {
                max_body_bytes: config.max_body_bytes,
                read_timeout: config.read_timeout,
            },
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections until the listener fails. One request per
    /// connection; a failing connection never stops the loop.
    pub fn run(&self) -> Result<()> {
        log::info!(
            "app running on {} with {} workers",
            self.local_addr()?,
            self.pool.size()
        );

        for stream in self.listener.incoming() {
            let stream = match stream {
                Ok(stream) => stream,
                Err(e) => {
                    log::warn!("Error getting stream: {e}");
                    continue;
                }
            };

            let analysis = self.analysis;
            let limits = self.limits;
            let queued = self.pool.execute(move || {
                if let Err(e) = handle_connection(stream, &analysis, limits) {
                    log::warn!("Error handling connection: {e}");
                }
            });

            if let Err(e) = queued {
                log::error!("Error sending connection to the pool: {e}");
            }
        }

        Ok(())
    }
}

fn handle_connection(mut stream: TcpStream, analysis: &Analysis, limits: Limits) -> Result<()> {
    stream.set_read_timeout(limits.read_timeout)?;
    let peer = stream.peer_addr()?;
    let mut reader = BufReader::new(stream.try_clone()?);

    match Request::read_from(&mut reader, limits.max_body_bytes) {
        Ok(request) => {
            let response = handle(&request, analysis);
            response.write_to(&mut stream)?;
            log::info!("{peer} {} {} -> {}", request.method, request.path, response.status);
        }
        // the client is gone or stalled, nobody to answer
        Err(Error::Io(e)) => return Err(Error::Io(e)),
        Err(e) => {
            let response = Response::failure(&e);
            response.write_to(&mut stream)?;
            log::info!("{peer} <unreadable request> -> {}", response.status);

            // unread input would turn the close into a reset
            stream.shutdown(Shutdown::Write)?;
            let _ = io::copy(&mut reader.take(MAX_DRAIN_BYTES), &mut io::sink());
        }
    }
    Ok(())
}
