// VibraWatch — Hardware & System Configuration
// Target: ESP32 DevKit V1 + MPU6050 vibration probe

// ---------------------------------------------------------------------------
// GPIO Pin Definitions (ESP32 DevKit V1 pinout)
// ---------------------------------------------------------------------------
pub const PIN_I2C_SDA: i32 = 21;    // I2C data line
pub const PIN_I2C_SCL: i32 = 22;    // I2C clock line
pub const PIN_LED_GREEN: i32 = 15;  // Status lamp — normal
pub const PIN_LED_YELLOW: i32 = 4;  // Status lamp — warning / connecting
pub const PIN_LED_RED: i32 = 5;     // Status lamp — critical / offline
pub const PIN_BUZZER: i32 = 18;     // Piezo buzzer (LEDC PWM)

// ---------------------------------------------------------------------------
// I2C Bus
// ---------------------------------------------------------------------------
pub const I2C_ADDR_MPU6050: u8 = 0x68;
pub const I2C_TIMEOUT_TICKS: u32 = 1000; // FreeRTOS ticks

// ---------------------------------------------------------------------------
// Sampling
// ---------------------------------------------------------------------------
pub const SENSOR_ID: &str = "esp32_mpu6050_01";
pub const SAMPLE_RATE_HZ: u32 = 200;
pub const SAMPLE_INTERVAL_MS: u64 = (1000 / SAMPLE_RATE_HZ) as u64; // 5 ms
pub const SAMPLE_COUNT: usize = 25; // readings per batch → one inference request

// ---------------------------------------------------------------------------
// Wi-Fi
// ---------------------------------------------------------------------------
pub const DEFAULT_WIFI_SSID: &str = "shopfloor";
pub const DEFAULT_WIFI_PASS: &str = "vibrawatch";
pub const CONNECT_POLL_MS: u64 = 500;
pub const CONNECT_MAX_POLLS: u32 = 40; // 40 × 500 ms = 20 s before giving up

// ---------------------------------------------------------------------------
// Inference Service
// ---------------------------------------------------------------------------
pub const SERVER_HOST: &str = "192.168.0.42";
pub const SERVER_PORT: u16 = 8000;
pub const PREDICT_PATH: &str = "/predict";
pub const HTTP_TIMEOUT_MS: u64 = 5000;

// ---------------------------------------------------------------------------
// Alerting
// ---------------------------------------------------------------------------
pub const WARN_RATIO: f32 = 0.7; // distance/threshold above this → Warning
pub const TONE_FREQ_HZ: u32 = 2000;
pub const TONE_DURATION_MS: u64 = 1000;

// ---------------------------------------------------------------------------
// Credential Store (NVS)
// ---------------------------------------------------------------------------
pub const NVS_NAMESPACE: &str = "wifi";
pub const NVS_KEY_SSID: &str = "ssid";
pub const NVS_KEY_PASS: &str = "pass";

// ---------------------------------------------------------------------------
// Timing (milliseconds)
// ---------------------------------------------------------------------------
pub const LOOP_IDLE_MS: u64 = 50;      // breather between decision cycles
pub const RESTART_DELAY_MS: u64 = 2000; // lets the save page reach the browser

// ---------------------------------------------------------------------------
// MPU6050 Sensor Scale Factors
// ---------------------------------------------------------------------------
pub const ACCEL_SCALE_4G: f32 = 8192.0; // LSB/g at ±4 g
pub const GRAVITY_MS2: f32 = 9.80665;
