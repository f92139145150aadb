// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use freight_desk_audit::{Actor, Cause};

pub const OWNER_ID: i64 = 11;
pub const OTHER_USER_ID: i64 = 12;

pub fn create_test_actor(user_id: i64, role: &str) -> Actor {
    Actor::new(user_id, role.to_string())
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-456"), String::from("API request"))
}
