use serde::{Deserialize, Serialize};

use crate::Point;
use crate::stone::Stone;

/// The single point blocked by the ko rule and the color that may not play there this turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ko {
    pub pos: Point,
    pub illegal: Stone,
}
