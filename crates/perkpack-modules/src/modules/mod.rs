//! The behavior module variants

mod auto_consumer;
mod buff_from_inventory;
mod consume_buff;
mod fall_buff;
mod generic;
mod hold_drop;
mod hunger_meter;
mod item_remover;
mod item_transformer;
mod jazz_hand;
mod mass_controller;
mod object_spawner;
mod on_damage;
mod removal_timer;
mod roach_banker;

pub use auto_consumer::{AutoConsumer, AutoConsumerConfig, ConsumptionReason, LOW_HEALTH_FRACTION};
pub use buff_from_inventory::{BuffFromInventory, BuffFromInventoryConfig};
pub use consume_buff::{ConsumeBuff, ConsumeBuffConfig};
pub use fall_buff::{FallBuff, FallBuffConfig};
pub use generic::GenericModule;
pub use hold_drop::{HoldDrop, HoldDropConfig};
pub use hunger_meter::{HungerMeter, HungerMeterConfig};
pub use item_remover::{ItemRemover, ItemRemoverConfig};
pub use item_transformer::{ItemTransformer, ItemTransformerConfig, TransformerState, SCAN_INTERVAL};
pub use jazz_hand::{JazzHand, JazzHandConfig};
pub use mass_controller::{MassController, MassControllerConfig};
pub use object_spawner::{ObjectSpawner, ObjectSpawnerConfig};
pub use on_damage::{OnDamage, OnDamageConfig, OnDamageState, ANY_DAMAGE};
pub use removal_timer::{RemovalTimer, RemovalTimerConfig};
pub use roach_banker::{RoachBanker, RoachBankerConfig};
