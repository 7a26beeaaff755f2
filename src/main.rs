// VibraWatch — Firmware Entry Point
//
// Boot sequence:
//   1. Link runtime patches, bring up logging, take the peripherals.
//   2. Load Wi-Fi credentials from NVS (built-in defaults when absent).
//   3. Initialise the I2C bus and MPU6050; self-test result goes to serial.
//   4. Configure the status LEDs and the buzzer channel.
//   5. Start the credential portal on the embedded HTTP server.
//   6. Enter the sample → batch → transmit → decide loop.
//
// The loop never exits. A failed connection skips the cycle and retries
// next time round; a failed inference request keeps the previous alert
// level. Saving new credentials through the portal restarts the device
// after a short grace delay.

#[cfg(target_os = "espidf")]
mod firmware {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};
    use std::thread;
    use std::time::Duration;

    use esp_idf_hal::gpio::{OutputPin, PinDriver};
    use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
    use esp_idf_hal::ledc::config::TimerConfig;
    use esp_idf_hal::ledc::{LedcDriver, LedcTimerDriver};
    use esp_idf_hal::prelude::*;
    use esp_idf_svc::eventloop::EspSystemEventLoop;
    use esp_idf_svc::nvs::EspDefaultNvsPartition;
    use esp_idf_svc::wifi::EspWifi;

    use vibrawatch::alert::AlertMachine;
    use vibrawatch::app::App;
    use vibrawatch::batch::BatchBuilder;
    use vibrawatch::config::*;
    use vibrawatch::drivers::buzzer::Buzzer;
    use vibrawatch::drivers::imu::{Mpu6050, SharedBus};
    use vibrawatch::drivers::leds::StatusLeds;
    use vibrawatch::drivers::AlertPanel;
    use vibrawatch::inference::InferenceClient;
    use vibrawatch::net::{EspTransport, EspWifiLink};
    use vibrawatch::portal::Portal;
    use vibrawatch::session::SessionManager;
    use vibrawatch::storage::NvsCredentialStore;
    use vibrawatch::traits::SystemClock;
    use vibrawatch::types::Credentials;
    use vibrawatch::web;

    pub fn run() -> anyhow::Result<()> {
        // Link esp-idf-sys runtime patches and initialise logging.
        esp_idf_svc::sys::link_patches();
        esp_idf_svc::log::EspLogger::initialize_default();
        log::info!("VibraWatch firmware starting…");

        // ---- Peripherals ---------------------------------------------------
        let peripherals = Peripherals::take()?;
        let sysloop = EspSystemEventLoop::take()?;
        let nvs_partition = EspDefaultNvsPartition::take()?;

        // ---- Credentials ---------------------------------------------------
        let mut store = NvsCredentialStore::new(nvs_partition.clone())?;
        let credentials = Credentials::load_or_builtin(&mut store);

        // ---- I2C bus + IMU self-test ---------------------------------------
        let i2c_config = I2cConfig::new().baudrate(400u32.kHz().into());
        let i2c = I2cDriver::new(
            peripherals.i2c0,
            peripherals.pins.gpio21, // SDA
            peripherals.pins.gpio22, // SCL
            &i2c_config,
        )?;
        // The bus outlives everything (firmware never exits), so leak it and
        // hand out a 'static handle.
        let i2c_bus: SharedBus = Box::leak(Box::new(Mutex::new(i2c)));

        let imu = Mpu6050::new(i2c_bus);
        if imu.is_connected() {
            imu.init()?;
        } else {
            log::error!("MPU6050 not responding on I2C — batches will carry zero samples");
            // Continue anyway so the portal stays reachable for recovery.
        }

        // ---- Status LEDs + buzzer ------------------------------------------
        let leds = StatusLeds::new(
            PinDriver::output(peripherals.pins.gpio15.downgrade_output())?,
            PinDriver::output(peripherals.pins.gpio4.downgrade_output())?,
            PinDriver::output(peripherals.pins.gpio5.downgrade_output())?,
        );
        let tone_timer = LedcTimerDriver::new(
            peripherals.ledc.timer0,
            &TimerConfig::default().frequency(TONE_FREQ_HZ.Hz().into()),
        )?;
        let buzzer = Buzzer::new(LedcDriver::new(
            peripherals.ledc.channel0,
            tone_timer,
            peripherals.pins.gpio18,
        )?);
        let alerts = AlertMachine::new(AlertPanel::new(leds, buzzer));

        // ---- Wi-Fi + inference client --------------------------------------
        let wifi = EspWifi::new(peripherals.modem, sysloop.clone(), Some(nvs_partition))?;
        let session = SessionManager::new(EspWifiLink::new(wifi), SystemClock, credentials.clone());

        let batcher = BatchBuilder::new(
            imu,
            SystemClock,
            Duration::from_millis(SAMPLE_INTERVAL_MS),
        );

        let client = InferenceClient::new(
            EspTransport::new(Duration::from_millis(HTTP_TIMEOUT_MS)),
            format!("http://{SERVER_HOST}:{SERVER_PORT}{PREDICT_PATH}"),
        );
        log::info!("inference endpoint: {}", client.endpoint());

        let mut app = App::new(session, batcher, client, alerts, SENSOR_ID);

        // ---- Credential portal ---------------------------------------------
        let restart_pending = Arc::new(AtomicBool::new(false));
        let store = Arc::new(Mutex::new(store));
        let _portal = web::serve(
            Portal::new(&credentials),
            Arc::clone(&store),
            Arc::clone(&restart_pending),
        )?;
        log::info!("credential portal ready at /wifi");

        // ---- Decision loop -------------------------------------------------
        log::info!("boot complete — entering decision loop");
        let idle = Duration::from_millis(LOOP_IDLE_MS);
        loop {
            // Portal effects are serviced here, between cycles, never mid-cycle.
            if restart_pending.load(Ordering::SeqCst) {
                log::info!("restarting to apply new Wi-Fi credentials");
                thread::sleep(Duration::from_millis(RESTART_DELAY_MS));
                esp_idf_hal::reset::restart();
            }

            app.run_cycle();
            thread::sleep(idle);
        }
    }
}

#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    firmware::run()
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    // The binary only means something on the chip; host builds exist for the
    // library test suite.
    eprintln!("vibrawatch is ESP-IDF firmware; build with the espidf target to run it");
}
