//! Battery telemetry.
//!
//! Reads a voltage/current probe (INA219 on the deployed device), maps bus
//! voltage to a 2S pack percentage, keeps a sliding buffer of discharge
//! current to estimate remaining time, and formats the status string
//! existing consumers display verbatim, e.g. "75.3%, 6h 30min".

use std::collections::VecDeque;

use anyhow::Result;

/// Pack cutoff voltage: below this the pack reads 0%.
const MIN_VOLTAGE_V: f64 = 6.0;
/// Fully charged 2S pack voltage.
const MAX_VOLTAGE_V: f64 = 8.4;
/// Currents within +-10 mA of zero are treated as idle.
const IDLE_CURRENT_MA: f64 = 10.0;
/// Discharge-current samples retained for the running average.
const CURRENT_BUFFER_LEN: usize = 60;

/// One probe reading. Discharge current is negative by the probe's sign
/// convention.
#[derive(Clone, Copy, Debug)]
pub struct BatteryReading {
    pub bus_voltage_v: f64,
    pub current_ma: f64,
}

/// Voltage/current sensor capability.
pub trait BatteryProbe: Send {
    fn read(&mut self) -> Result<BatteryReading>;
}

/// Simulated probe: drains linearly from full at ~0.01 V per read. Lets the
/// daemon and demo run without I2C hardware.
pub struct StubBatteryProbe {
    voltage_v: f64,
}

impl StubBatteryProbe {
    pub fn new() -> Self {
        Self { voltage_v: 8.3 }
    }
}

impl Default for StubBatteryProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl BatteryProbe for StubBatteryProbe {
    fn read(&mut self) -> Result<BatteryReading> {
        self.voltage_v = (self.voltage_v - 0.01).max(MIN_VOLTAGE_V);
        Ok(BatteryReading {
            bus_voltage_v: self.voltage_v,
            current_ma: -420.0,
        })
    }
}

/// Battery status estimator.
pub struct BatteryMonitor {
    probe: Box<dyn BatteryProbe>,
    discharge_buffer: VecDeque<f64>,
    nominal_capacity_mah: f64,
}

impl BatteryMonitor {
    pub fn new(probe: Box<dyn BatteryProbe>, nominal_capacity_mah: f64) -> Self {
        Self {
            probe,
            discharge_buffer: VecDeque::with_capacity(CURRENT_BUFFER_LEN),
            nominal_capacity_mah,
        }
    }

    /// Read the probe and produce the formatted status string. Probe
    /// failures are reported in-band; telemetry must never take the
    /// process down.
    pub fn status_string(&mut self) -> String {
        let reading = match self.probe.read() {
            Ok(reading) => reading,
            Err(e) => {
                log::warn!("battery probe read failed: {}", e);
                return "Bateria: Erro Leitura".to_string();
            }
        };

        let percentage = voltage_to_percentage(reading.bus_voltage_v);
        self.update_discharge_buffer(reading.current_ma);
        let avg_discharge_ma = self.average_discharge_ma();
        let remaining = remaining_time_hours(percentage, avg_discharge_ma, self.nominal_capacity_mah);
        let time_str = self.format_time(remaining, reading.current_ma);

        format!("{:.1}%, {}", percentage, time_str)
    }

    fn update_discharge_buffer(&mut self, current_ma: f64) {
        if current_ma < -IDLE_CURRENT_MA {
            if self.discharge_buffer.len() >= CURRENT_BUFFER_LEN {
                self.discharge_buffer.pop_front();
            }
            self.discharge_buffer.push_back(current_ma.abs());
        } else if current_ma > IDLE_CURRENT_MA {
            // Charging invalidates the discharge average.
            self.discharge_buffer.clear();
        }
    }

    fn average_discharge_ma(&self) -> f64 {
        if self.discharge_buffer.is_empty() {
            return 0.0;
        }
        self.discharge_buffer.iter().sum::<f64>() / self.discharge_buffer.len() as f64
    }

    /// `remaining` of `None` means no usable estimate (idle or charging).
    fn format_time(&self, remaining: Option<f64>, current_ma: f64) -> String {
        let hours = match remaining {
            None => {
                if current_ma > IDLE_CURRENT_MA {
                    return "Carregando".to_string();
                }
                if self.discharge_buffer.is_empty() {
                    return "Calculando...".to_string();
                }
                return "Completo".to_string();
            }
            Some(hours) => hours,
        };

        if hours <= 0.0 {
            return "Descarregado".to_string();
        }

        let whole_hours = hours as u64;
        let minutes = ((hours * 60.0) as u64) % 60;
        if whole_hours == 0 {
            if minutes < 1 {
                "< 1 min".to_string()
            } else {
                format!("{}min", minutes)
            }
        } else {
            format!("{}h {}min", whole_hours, minutes)
        }
    }
}

fn voltage_to_percentage(bus_voltage_v: f64) -> f64 {
    if bus_voltage_v <= MIN_VOLTAGE_V {
        return 0.0;
    }
    if bus_voltage_v >= MAX_VOLTAGE_V {
        return 100.0;
    }
    (bus_voltage_v - MIN_VOLTAGE_V) / (MAX_VOLTAGE_V - MIN_VOLTAGE_V) * 100.0
}

fn remaining_time_hours(
    percentage: f64,
    avg_discharge_ma: f64,
    nominal_capacity_mah: f64,
) -> Option<f64> {
    if avg_discharge_ma < IDLE_CURRENT_MA {
        return None;
    }
    let remaining_mah = percentage / 100.0 * nominal_capacity_mah;
    if remaining_mah <= 0.0 {
        return Some(0.0);
    }
    Some(remaining_mah / avg_discharge_ma)
}
