use std::io::Result;
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Binds a listener to an OS-assigned port on the loopback interface and
/// returns it with the address it actually bound to.
pub async fn bind_loopback_listener() -> Result<(TcpListener, SocketAddr)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let address = listener.local_addr()?;
    Ok((listener, address))
}
