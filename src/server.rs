use std::{
    io::{Read, Write},
    net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs},
    sync::Arc,
};

use log::info;

use crate::{
    config::ServerConfig,
    session::{ServerError, Session},
    spec::HANDSHAKE,
    vm::{Debuggee, SourceInfo},
};

/// Listens for a debugger to attach.
#[derive(Debug)]
pub struct JdwpServer {
    listener: TcpListener,
    config: ServerConfig,
}

impl JdwpServer {
    pub fn bind<A: ToSocketAddrs>(addr: A, config: ServerConfig) -> Result<JdwpServer, ServerError> {
        let listener = TcpListener::bind(addr)?;
        info!("listening for a debugger on {}", listener.local_addr()?);
        Ok(JdwpServer { listener, config })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Blocks until a debugger connects, then exchanges the handshake with
    /// it.
    ///
    /// The session is idle until an interpreter thread calls
    /// [Session::start].
    pub fn accept(
        &self,
        debuggee: Arc<dyn Debuggee>,
        source: Arc<dyn SourceInfo>,
    ) -> Result<Arc<Session>, ServerError> {
        let (mut stream, peer) = self.listener.accept()?;
        info!("debugger connected from {}", peer);
        handshake(&mut stream, &self.config)?;
        info!("handshake with {} done", peer);
        Session::new(self.config.clone(), stream, debuggee, source).map(Arc::new)
    }
}

fn handshake(stream: &mut TcpStream, config: &ServerConfig) -> Result<(), ServerError> {
    stream.set_read_timeout(config.handshake_timeout)?;
    let mut received = [0; HANDSHAKE.len()];
    stream.read_exact(&mut received)?;
    if &received != HANDSHAKE {
        return Err(ServerError::Handshake(received.to_vec()));
    }
    stream.write_all(HANDSHAKE)?;
    Ok(())
}
