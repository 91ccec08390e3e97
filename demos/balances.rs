//! Balances that know nothing about persistence, and a storage that knows
//! nothing about balances, wired together through events.
//!
//! Run with: `cargo run --example balances`

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use eventline::{Event, Events, Subscribable, Unsubscribe};

/// Snapshot passed to subscribers.
#[derive(Clone, Copy, Debug)]
struct BalanceState {
    id: u64,
    value: i64,
    blocked: bool,
}

#[derive(Default)]
struct Balances {
    list: Mutex<HashMap<u64, BalanceState>>,
    events: Events<BalanceState>,
    created: Event<u64>,
}

impl Balances {
    fn on_new_balance(&self, f: impl Fn(u64) + Send + Sync + 'static) -> Unsubscribe {
        self.created.subscribe(move |id| f(*id))
    }

    fn listeners(&self) -> &impl Subscribable<BalanceState> {
        &self.events
    }

    fn open(&self, id: u64) {
        let created = {
            let mut list = self.list.lock().unwrap_or_else(|e| e.into_inner());
            if list.contains_key(&id) {
                false
            } else {
                list.insert(id, BalanceState { id, value: 0, blocked: false });
                true
            }
        };
        if created {
            self.created.trigger(id);
        }
    }

    fn change(&self, id: u64, amount: i64) -> anyhow::Result<()> {
        let state = self.update(id, |b| b.value += amount)?;
        self.events.trigger("balance-change", state);
        Ok(())
    }

    fn block(&self, id: u64) -> anyhow::Result<()> {
        let mut newly_blocked = false;
        let state = self.update(id, |b| {
            newly_blocked = !b.blocked;
            b.blocked = true;
        })?;
        if newly_blocked {
            self.events.trigger("balance-block", state);
        }
        Ok(())
    }

    fn update(&self, id: u64, f: impl FnOnce(&mut BalanceState)) -> anyhow::Result<BalanceState> {
        let mut list = self.list.lock().unwrap_or_else(|e| e.into_inner());
        let balance = list
            .get_mut(&id)
            .ok_or_else(|| anyhow::anyhow!("balance {id} does not exist"))?;
        f(balance);
        Ok(*balance)
    }
}

#[derive(Default)]
struct Storage {
    data: Mutex<HashMap<u64, i64>>,
}

impl Storage {
    fn save_value(&self, key: u64, value: i64) {
        self.data
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key, value);
        println!("Balance [{key}] saved: {value}");
    }
}

fn main() -> anyhow::Result<()> {
    let balances = Balances::default();

    // Storage wiring
    let storage = Arc::new(Storage::default());
    let _created = balances.on_new_balance(|id| println!("Balance with id [{id}] created"));
    let s = Arc::clone(&storage);
    let _saved = balances
        .listeners()
        .on("balance-change", move |b| s.save_value(b.id, b.value));
    let _blocked = balances.listeners().on("balance-block", |b| {
        println!("Balance [{}] blocked with amount [{}]", b.id, b.value)
    });
    let _audit = balances.listeners().subscribe_all(|name, b| {
        println!("  audit: {name} -> {b:?}");
    });

    // Business logic
    balances.open(1);
    balances.change(1, 10)?;
    balances.change(1, -5)?;
    balances.block(1)?;
    balances.block(1)?;

    // Concurrent delivery of one more change
    balances
        .events
        .trigger_async("balance-change", BalanceState { id: 1, value: 5, blocked: true })?;

    Ok(())
}
