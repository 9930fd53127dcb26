use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::array::prelude::*;

#[tokio::test]
async fn reduce_seeds_from_the_first_element() -> anyhow::Result<()> {
    let array = AsyncArray::from(vec![1, 2, 3, 4]);

    let sum = array
        .yielding()
        .reduce(|acc, item, _| async move { Ok(Some(acc.unwrap_or(0) + item.unwrap_or(0))) })
        .await?;

    assert_eq!(sum, Some(10));

    Ok(())
}

#[tokio::test]
async fn reduce_on_empty_without_seed_is_an_error() -> anyhow::Result<()> {
    let array = AsyncArray::<i32>::new();

    let failure = array
        .yielding()
        .reduce(|acc, _, _| async move { Ok(acc) })
        .await;
    assert!(matches!(failure, Err(Error::EmptyReduce)));

    let failure = array
        .yielding()
        .reduce_right(|acc, _, _| async move { Ok(acc) })
        .await;
    assert!(matches!(failure, Err(Error::EmptyReduce)));

    Ok(())
}

#[tokio::test]
async fn single_element_reduce_never_invokes_the_callback() -> anyhow::Result<()> {
    let array = AsyncArray::from(vec![7]);
    let calls = Arc::new(AtomicUsize::new(0));

    let seen = calls.clone();
    let seed = array
        .yielding()
        .reduce(move |acc, _, _| {
            let seen = seen.clone();
            async move {
                seen.fetch_add(1, Ordering::SeqCst);
                Ok(acc)
            }
        })
        .await?;

    assert_eq!(seed, Some(7));
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    Ok(())
}

#[tokio::test]
async fn fold_on_empty_resolves_the_initial_value_untouched() -> anyhow::Result<()> {
    let array = AsyncArray::<i32>::new();
    let calls = Arc::new(AtomicUsize::new(0));

    let seen = calls.clone();
    let total = array
        .yielding()
        .fold(0, move |acc, item, _| {
            let seen = seen.clone();
            async move {
                seen.fetch_add(1, Ordering::SeqCst);
                Ok(acc + item.unwrap_or(0))
            }
        })
        .await?;

    assert_eq!(total, 0);
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    Ok(())
}

#[tokio::test]
async fn fold_matches_a_plain_fold() -> anyhow::Result<()> {
    let elements: Vec<i64> = (0..20).collect();
    let expected: i64 = elements.iter().sum();

    let array = AsyncArray::from(elements);
    let total = array
        .yielding()
        .fold(0i64, |acc, item, _| async move { Ok(acc + item.unwrap_or(0)) })
        .await?;

    assert_eq!(total, expected);

    Ok(())
}

#[tokio::test]
async fn reduce_right_runs_right_to_left() -> anyhow::Result<()> {
    let array = AsyncArray::from(vec![1, 2, 3]);

    // seeded with 3, then 3-2, then 1-1: order-sensitive on purpose
    let result = array
        .yielding()
        .reduce_right(|acc, item, _| async move { Ok(Some(acc.unwrap_or(0) - item.unwrap_or(0))) })
        .await?;

    assert_eq!(result, Some(0));

    Ok(())
}

#[tokio::test]
async fn fold_right_runs_right_to_left() -> anyhow::Result<()> {
    let array = AsyncArray::from(vec!['a', 'b', 'c']);

    let reversed = array
        .yielding()
        .fold_right(String::new(), |mut acc, item, _| async move {
            if let Some(letter) = item {
                acc.push(letter);
            }
            Ok(acc)
        })
        .await?;

    assert_eq!(reversed, "cba");

    Ok(())
}

#[tokio::test]
async fn accumulator_failure_aborts_remaining_steps() -> anyhow::Result<()> {
    let array = AsyncArray::from(vec![1, 2, 3, 4]);
    let calls = Arc::new(AtomicUsize::new(0));

    let seen = calls.clone();
    let failure = array
        .yielding()
        .fold(0, move |acc, item, position| {
            let seen = seen.clone();
            async move {
                seen.fetch_add(1, Ordering::SeqCst);
                if position == 1 {
                    anyhow::bail!("accumulator exploded");
                }
                Ok(acc + item.unwrap_or(0))
            }
        })
        .await;

    assert!(matches!(failure, Err(Error::Callback { position: 1, .. })));
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    Ok(())
}

#[tokio::test]
async fn a_hole_can_seed_a_reduce() -> anyhow::Result<()> {
    let array = AsyncArray::from_slots(vec![None, Some(5)]);

    let total = array
        .yielding()
        .reduce(|acc, item, _| async move { Ok(Some(acc.unwrap_or(0) + item.unwrap_or(0))) })
        .await?;

    assert_eq!(total, Some(5));

    Ok(())
}
