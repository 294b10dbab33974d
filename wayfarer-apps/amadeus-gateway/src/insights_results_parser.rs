//!  Wayfarer Amadeus Gateway
//!
//!  Copyright (C) 2026  Mamy Ratsimbazafy
//!
//!  This program is free software: you can redistribute it and/or modify
//!  it under the terms of the GNU Affero General Public License as published by
//!  the Free Software Foundation, either version 3 of the License, or
//!  (at your option) any later version.
//!
//!  This program is distributed in the hope that it will be useful,
//!  but WITHOUT ANY WARRANTY; without even the implied warranty of
//!  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//!  GNU Affero General Public License for more details.
//!
//!  You should have received a copy of the GNU Affero General Public License
//!  along with this program.  If not, see <http://www.gnu.org/licenses/>.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::json_path::{data_array, text_at, u64_at};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationScore {
    pub destination: Option<String>,
    pub flights_score: Option<u64>,
    pub travelers_score: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodScore {
    pub period: Option<String>,
    pub travelers_score: Option<u64>,
    pub flights_score: Option<u64>,
}

pub fn parse_destination_scores(raw: &Value) -> Result<Vec<DestinationScore>> {
    Ok(data_array(raw)?
        .iter()
        .map(|item| DestinationScore {
            destination: text_at(item, "/destination"),
            flights_score: u64_at(item, "/analytics/flights/score"),
            travelers_score: u64_at(item, "/analytics/travelers/score"),
        })
        .collect())
}

pub fn parse_period_scores(raw: &Value) -> Result<Vec<PeriodScore>> {
    Ok(data_array(raw)?
        .iter()
        .map(|item| PeriodScore {
            period: text_at(item, "/period"),
            travelers_score: u64_at(item, "/analytics/travelers/score"),
            flights_score: u64_at(item, "/analytics/flights/score"),
        })
        .collect())
}
