//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements                   | Connects to                |
//! |-------------|------------------------------|----------------------------|
//! | `hardware`  | GpioPort, ClockPort          | ESP32 GPIO, ADC, LEDC      |
//! |             | AccelerometerBus             | via `i2c_bus`              |
//! |             | PersistentByteStore          | via `nvs`                  |
//! | `i2c_bus`   | AccelerometerBus             | any `embedded-hal` I²C     |
//! | `log_sink`  | EventSink                    | Serial log output          |
//! | `nvs`       | PersistentByteStore          | NVS / in-memory store      |
//! | `time`      | (used by `hardware`)         | ESP32 system timer         |

pub mod hardware;
pub mod i2c_bus;
pub mod log_sink;
pub mod nvs;
pub mod time;
