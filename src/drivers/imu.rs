// VibraWatch — MPU6050 Accelerometer Driver
//
// Custom register-level driver over shared I2C bus.
// Avoids external crate version conflicts with esp-idf-hal.

use std::sync::Mutex;

use esp_idf_hal::i2c::I2cDriver;

use crate::config::*;
use crate::traits::SampleSource;
use crate::types::Sample;

/// Thread-safe handle to a shared I2C bus.
pub type SharedBus = &'static Mutex<I2cDriver<'static>>;

// MPU6050 register addresses
const REG_PWR_MGMT_1: u8 = 0x6B;
const REG_CONFIG: u8 = 0x1A;
const REG_ACCEL_CONFIG: u8 = 0x1C;
const REG_ACCEL_XOUT_H: u8 = 0x3B; // Start of the 6-byte accel burst
const REG_WHO_AM_I: u8 = 0x75;
const WHO_AM_I_EXPECTED: u8 = 0x68;

pub struct Mpu6050 {
    bus: SharedBus,
}

impl Mpu6050 {
    pub fn new(bus: SharedBus) -> Self {
        Self { bus }
    }

    /// Verify the device is reachable on the I2C bus.
    pub fn is_connected(&self) -> bool {
        let mut bus = self.bus.lock().unwrap();
        let mut buf = [0u8; 1];
        match bus.write_read(I2C_ADDR_MPU6050, &[REG_WHO_AM_I], &mut buf, I2C_TIMEOUT_TICKS) {
            Ok(()) => buf[0] == WHO_AM_I_EXPECTED,
            Err(_) => false,
        }
    }

    /// Wake the sensor and configure the accelerometer for ±4 g with the
    /// DLPF wide open; the vibration band of interest sits well below the
    /// 260 Hz cutoff.
    pub fn init(&self) -> anyhow::Result<()> {
        let mut bus = self.bus.lock().unwrap();

        // Wake up (clear SLEEP bit)
        bus.write(I2C_ADDR_MPU6050, &[REG_PWR_MGMT_1, 0x00], I2C_TIMEOUT_TICKS)?;

        // DLPF bandwidth 260 Hz
        bus.write(I2C_ADDR_MPU6050, &[REG_CONFIG, 0x00], I2C_TIMEOUT_TICKS)?;

        // Accelerometer: ±4 g
        bus.write(I2C_ADDR_MPU6050, &[REG_ACCEL_CONFIG, 0x08], I2C_TIMEOUT_TICKS)?;

        log::info!("MPU6050 initialised (±4g, DLPF 260Hz)");
        Ok(())
    }

    /// Burst-read the three acceleration axes and convert to m/s².
    pub fn read_sample(&self) -> anyhow::Result<Sample> {
        let mut bus = self.bus.lock().unwrap();
        let mut raw = [0u8; 6];
        bus.write_read(
            I2C_ADDR_MPU6050,
            &[REG_ACCEL_XOUT_H],
            &mut raw,
            I2C_TIMEOUT_TICKS,
        )?;

        let to_ms2 = |hi, lo| i16::from_be_bytes([hi, lo]) as f32 / ACCEL_SCALE_4G * GRAVITY_MS2;
        Ok(Sample::new(
            to_ms2(raw[0], raw[1]),
            to_ms2(raw[2], raw[3]),
            to_ms2(raw[4], raw[5]),
        ))
    }
}

impl SampleSource for Mpu6050 {
    fn sample(&mut self) -> Sample {
        // The batch contract is infallible: a misbehaving bus yields a zero
        // sample rather than a hole in the window.
        self.read_sample().unwrap_or_else(|e| {
            log::warn!("IMU read failed: {e:#}");
            Sample::default()
        })
    }
}
