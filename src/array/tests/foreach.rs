use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::array::prelude::*;

#[tokio::test]
async fn visits_every_position_in_order() -> anyhow::Result<()> {
    let array = AsyncArray::from(vec![10, 20, 30]);
    let visited = AsyncArray::new();

    let sink = visited.clone();
    array
        .yielding()
        .for_each(move |item, position| {
            let sink = sink.clone();
            async move {
                sink.direct().push((position, item));
                Ok(())
            }
        })
        .await?;

    assert_eq!(
        visited.direct().snapshot(),
        vec![
            Some((0, Some(10))),
            Some((1, Some(20))),
            Some((2, Some(30))),
        ]
    );

    Ok(())
}

#[tokio::test]
async fn appending_mid_traversal_never_adds_steps() -> anyhow::Result<()> {
    let array = AsyncArray::from(vec![1, 2, 3, 4, 5]);
    let steps = Arc::new(AtomicUsize::new(0));

    let handle = array.clone();
    let counter = steps.clone();
    array
        .yielding()
        .for_each(move |_, position| {
            let handle = handle.clone();
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                if position == 0 {
                    handle.direct().push(99);
                }
                Ok(())
            }
        })
        .await?;

    // the bound was captured at 5; the appended element is never visited
    assert_eq!(steps.load(Ordering::SeqCst), 5);
    assert_eq!(array.len(), 6);

    Ok(())
}

#[tokio::test]
async fn truncation_mid_traversal_reads_as_absent() -> anyhow::Result<()> {
    let array = AsyncArray::from(vec![10, 20, 30, 40, 50]);

    let handle = array.clone();
    let observed = array
        .yielding()
        .fold(Vec::new(), move |mut acc, item, position| {
            let handle = handle.clone();
            async move {
                if position == 1 {
                    handle.direct().set_len(2);
                }
                acc.push(item);
                Ok(acc)
            }
        })
        .await?;

    assert_eq!(observed, vec![Some(10), Some(20), None, None, None]);

    Ok(())
}

#[tokio::test]
async fn failure_keeps_committed_side_effects() -> anyhow::Result<()> {
    let array = AsyncArray::from(vec![1, 2, 3, 4, 5]);

    let handle = array.clone();
    let failure = array
        .yielding()
        .for_each(move |item, position| {
            let handle = handle.clone();
            async move {
                if position == 3 {
                    anyhow::bail!("step exploded");
                }
                handle.direct().set(position, item.unwrap_or(0) * 10);
                Ok(())
            }
        })
        .await;

    assert!(matches!(failure, Err(Error::Callback { position: 3, .. })));
    assert_eq!(
        array.direct().snapshot(),
        vec![Some(10), Some(20), Some(30), Some(4), Some(5)]
    );

    Ok(())
}

#[tokio::test]
async fn detached_callbacks_are_not_awaited_per_step() -> anyhow::Result<()> {
    let array = AsyncArray::from(vec![1, 2, 3, 4, 5]);
    let landed = Arc::new(AtomicUsize::new(0));

    let counter = landed.clone();
    array
        .yielding()
        .for_each_detached(move |item, _| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(item.unwrap_or(0) as usize, Ordering::SeqCst);
            }
        })
        .await;

    // the traversal only guarantees scheduling, so give the detached
    // callbacks their turns on the run loop
    for _ in 0..100 {
        if landed.load(Ordering::SeqCst) == 15 {
            break;
        }
        tokio::task::yield_now().await;
    }
    assert_eq!(landed.load(Ordering::SeqCst), 15);

    Ok(())
}
