//! Fan control service
//!
//! Owns the authoritative fan list. The list is built once by full
//! enumeration; afterwards it is only field-level updated: periodic
//! refresh touches `current_rpm` alone and user edits touch `target_rpm`
//! alone. The two actors mutate disjoint fields, so neither can clobber
//! the other; wholesale replacement would lose an in-flight user edit.

use crate::domain::fan::{actual_key, max_key, min_key, target_key};
use crate::domain::Fan;
use crate::helper::FanSpeedWriter;
use crate::smc::{SmcClient, SmcConnector};
use std::sync::{Arc, Mutex};

/// Service for fan enumeration, polling and speed requests
pub struct FanService<C: SmcConnector> {
    smc: Arc<SmcClient<C>>,
    fans: Mutex<Vec<Fan>>,
}

impl<C: SmcConnector> FanService<C> {
    pub fn new(smc: Arc<SmcClient<C>>) -> Self {
        Self {
            smc,
            fans: Mutex::new(Vec::new()),
        }
    }

    /// Full enumeration: read every fan's registers and rebuild the list
    ///
    /// Reads current/min/max/target per fan; missing registers degrade to
    /// zero (target falls back to the minimum). Bounds are repaired and the
    /// target clamped by [`Fan::new`]. Returns the new list.
    pub fn enumerate(&self) -> Vec<Fan> {
        let count = self.smc.fan_count();
        log::debug!("Enumerating {count} fans");

        let mut fans = Vec::with_capacity(count);
        for index in 0..count {
            let current = self.smc.read(&actual_key(index)).unwrap_or(0.0);
            let min = self.smc.read(&min_key(index)).unwrap_or(0.0);
            let max = self.smc.read(&max_key(index)).unwrap_or(0.0);
            let target = self.smc.read(&target_key(index)).unwrap_or(min);
            fans.push(Fan::new(index, current, min, max, target));
        }

        *self.fans.lock().unwrap() = fans.clone();
        fans
    }

    /// Snapshot of the current fan list
    pub fn fans(&self) -> Vec<Fan> {
        self.fans.lock().unwrap().clone()
    }

    /// Poll tick: update only `current_rpm` per entry
    ///
    /// Leaves targets untouched so a user's pending edit survives the
    /// refresh. Failed reads keep the previous value.
    pub fn refresh_current(&self) {
        let mut fans = self.fans.lock().unwrap();
        for fan in fans.iter_mut() {
            if let Some(current) = self.smc.read(&actual_key(fan.id)) {
                fan.current_rpm = current;
            }
        }
    }

    /// Request a fan speed change through the given write path
    ///
    /// The target is clamped into the fan's bounds and applied to the list
    /// optimistically, before the (possibly remote) write resolves; the
    /// return value is the write's status. Unknown indices resolve to
    /// false.
    pub fn request_fan_speed<W: FanSpeedWriter>(&self, index: usize, rpm: f64, writer: &W) -> bool {
        let clamped = {
            let mut fans = self.fans.lock().unwrap();
            let Some(fan) = fans.get_mut(index) else {
                log::warn!("Fan speed request for unknown fan {index}");
                return false;
            };
            let clamped = fan.set_target(rpm);
            if clamped != rpm {
                log::debug!(
                    "Requested {rpm} RPM clamped to {clamped} for fan {index} \
                     [{}-{}]",
                    fan.min_rpm,
                    fan.max_rpm
                );
            }
            clamped
        };

        writer.set_fan_speed(index, clamped)
    }
}
