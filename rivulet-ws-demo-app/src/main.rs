use futures::StreamExt;
use futures::stream;
use rivulet::observer::{IncrementalReceiver, LogSurface, OnCompleteReceiver, StreamingReceiver};
use rivulet::remote::{RemoteHandle, RemoteObjectId};
use rivulet::request::Cancellable;
use rivulet::wire::{Json, PartialResult};
use rivulet_tokio_rpc_client::RpcClient;
use rivulet_tokio_rpc_server::{RpcCallContext, RpcServer, utils::bind_loopback_listener};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Serialize, Deserialize)]
struct HistogramArgs {
    column: String,
    buckets: usize,
}

/// Streams a histogram in four slices, each reply carrying the counts
/// accumulated so far.
fn histogram(context: RpcCallContext) -> impl futures::Stream<Item = Result<PartialResult<Value>, String>> {
    let buckets = serde_json::from_value::<HistogramArgs>(context.arguments)
        .map(|args| {
            tracing::info!("Histogram of {} on {}", args.column, context.object_id);
            args.buckets
        })
        .map_err(|err| err.to_string());

    stream::iter(1..=4u64).then(move |slice| {
        let buckets = buckets.clone();
        async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            let buckets = buckets?;
            let counts: Vec<u64> = (0..buckets).map(|bucket| (bucket as u64 + 1) * slice).collect();
            Ok::<_, String>(PartialResult::new(slice as f64 / 4.0, Some(json!(counts))))
        }
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let (listener, addr) = bind_loopback_listener().await?;

    {
        let server = RpcServer::new();

        // The root object knows how to load a table and hands back its id.
        server
            .register("loadTable", |_context| {
                stream::iter(vec![
                    Ok::<_, String>(PartialResult::<Value>::progress(0.5)),
                    Ok(PartialResult::new(1.0, Some(json!("table-1")))),
                ])
            })
            .await;
        server.register("histogram", histogram).await;

        let _server_task = tokio::spawn(async move {
            let _ = Arc::new(server).serve_with_listener(listener).await;
        });
    }

    let client = RpcClient::new(&addr.ip().to_string(), addr.port());
    let surface = LogSurface::new();

    // Load a table from the initial object.
    let load = client.request(&RemoteHandle::initial(), "loadTable", &())?;
    let (table_tx, table_rx) = oneshot::channel::<RemoteObjectId>();
    load.invoke(OnCompleteReceiver::new(
        StreamingReceiver::new(&surface, Some(load.as_cancellable()), "Loading table"),
        move |table_id: RemoteObjectId| {
            let _ = table_tx.send(table_id);
        },
    ))?;
    let table = RemoteHandle::new(table_rx.await?);
    tracing::info!("Loaded table {}", table);

    // Chained: the elapsed time covers the load as well.
    let args = HistogramArgs {
        column: "age".to_string(),
        buckets: 5,
    };
    let histogram_call = client.request(&table, "histogram", &Json(&args))?;
    histogram_call.chain(Some(&load as &dyn Cancellable));
    let done = histogram_call.invoke(IncrementalReceiver::new(
        StreamingReceiver::new(&surface, Some(histogram_call.as_cancellable()), "Histogram"),
        |partial: &PartialResult<Vec<u64>>, elapsed: Option<i64>| {
            if let Some(counts) = &partial.data {
                tracing::info!("{:?} after {} ms", counts, elapsed.unwrap_or_default());
            }
        },
    ))?;
    done.await?;

    Ok(())
}
