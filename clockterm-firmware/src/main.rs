#![no_std]
#![no_main]

mod clock;

use assign_resources::assign_resources;
use clockterm_core::console::{Console, ConsoleConfig};
use defmt::info;
use embassy_executor::Spawner;
use embassy_rp::i2c::{self, Config as I2cConfig};
use embassy_rp::peripherals::{self, I2C1, UART0};
use embassy_rp::uart::{BufferedInterruptHandler, BufferedUart, Config as UartConfig};
use embassy_rp::bind_interrupts;
use ds323x::Ds323x;
use static_cell::StaticCell;
#[allow(unused_imports)]
use {defmt_rtt as _, panic_probe as _};

use crate::clock::accessor::ClockAccessor;
use crate::clock::ClockControl;

assign_resources! {
    console_uart: ConsoleUartPins {
        uart: UART0,
        tx_pin: PIN_0,
        rx_pin: PIN_1,
    },
    rtc_i2c: RtcI2cPins {
        sda_pin: PIN_2,
        scl_pin: PIN_3,
        i2c_peripheral: I2C1,
    },
}

bind_interrupts!(struct UartIrqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

bind_interrupts!(struct I2cIrqs {
    I2C1_IRQ => i2c::InterruptHandler<I2C1>;
});

const UART_BUFFER_SIZE: usize = 64;

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    let resources = split_resources! {p};

    info!("Launching RTC console");

    spawner.spawn(clock_task(resources.rtc_i2c)).unwrap();
    spawner.spawn(console_task(resources.console_uart)).unwrap();
}

#[embassy_executor::task]
async fn clock_task(rtc_i2c_pins: RtcI2cPins) {
    let i2c = i2c::I2c::new_async(
        rtc_i2c_pins.i2c_peripheral,
        rtc_i2c_pins.scl_pin,
        rtc_i2c_pins.sda_pin,
        I2cIrqs,
        I2cConfig::default(),
    );
    let rtc = Ds323x::new_ds3231(i2c);

    let mut clock_control = ClockControl::new(rtc);
    clock_control.run().await;
}

#[embassy_executor::task]
async fn console_task(uart_pins: ConsoleUartPins) {
    static TX_BUFFER: StaticCell<[u8; UART_BUFFER_SIZE]> = StaticCell::new();
    static RX_BUFFER: StaticCell<[u8; UART_BUFFER_SIZE]> = StaticCell::new();
    let uart = BufferedUart::new(
        uart_pins.uart,
        UartIrqs,
        uart_pins.tx_pin,
        uart_pins.rx_pin,
        TX_BUFFER.init([0; UART_BUFFER_SIZE]),
        RX_BUFFER.init([0; UART_BUFFER_SIZE]),
        UartConfig::default(),
    );
    let (rx, tx) = uart.split();

    let clock = match ClockAccessor::new() {
        Ok(clock) => clock,
        Err(_) => defmt::panic!("no clock watch slot left for the console"),
    };

    let mut console = Console::new(clock, rx, tx, ConsoleConfig::default());
    if let Err(e) = console.run().await {
        // Only a dead serial link or a clock that refused a validated
        // commit lands here; neither has a recovery path.
        defmt::panic!("console stopped: {}", e);
    }
}
