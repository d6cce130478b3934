#![no_std]
#![no_main]

use core::cell::RefCell;

use embassy_executor::{InterruptExecutor, Spawner};
use embassy_stm32::gpio::{Level, Output, Pin, Speed};
use embassy_stm32::interrupt;
use embassy_stm32::interrupt::{InterruptExt, Priority};
use embassy_stm32::usart::{Config as UsartConfig, Uart};
use embassy_stm32::{bind_interrupts, peripherals};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex as BlockingMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::{Duration, Timer};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use turret_controller::board::indicator::{Lamp, SharedLine, SharedOutput};
use turret_controller::board::serial::{HostRx, HostTx, HostUartTx, HOST_BAUD};
use turret_controller::board::servo::{ServoChannel, ServoTimer};
use turret_controller::board::Board;
use turret_controller::config::TurretConfig;
use turret_controller::tasks::{
    CommandPorts, CommandTask, ControlPorts, ControlTask, FirePorts, FireTask, Shared,
};
use turret_controller::{log_error, log_info};

type Command = CommandTask<'static, HostRx, SharedLine, Lamp, ServoChannel>;
type Control = ControlTask<'static, ServoChannel, SharedLine, HostTx>;
type Fire = FireTask<'static, ServoChannel, SharedLine, HostTx>;

// ── Shared aim state + signal set ─────────────────────────────────────────────
static SHARED: Shared = Shared::new();

// ── 'static peripherals ───────────────────────────────────────────────────────
static HOST_RX_DMA: StaticCell<[u8; 64]> = StaticCell::new();
static HOST_TX: StaticCell<Mutex<CriticalSectionRawMutex, HostUartTx>> = StaticCell::new();
static BUSY_LINE: StaticCell<SharedOutput> = StaticCell::new();

// ── High-priority executor (fire task) ────────────────────────────────────────
//  UART5 is unused on this board; its vector drives the executor.
static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();

#[interrupt]
unsafe fn UART5() {
    EXECUTOR_HIGH.on_interrupt()
}

// ── Interrupt bindings ────────────────────────────────────────────────────────
bind_interrupts!(struct Irqs {
    USART3 => embassy_stm32::usart::InterruptHandler<peripherals::USART3>;
});

// ── Tasks ─────────────────────────────────────────────────────────────────────
#[embassy_executor::task]
async fn command_task(mut task: Command) {
    if let Err(e) = task.run().await {
        log_error!("command link lost: {:?}", e);
    }
}

#[embassy_executor::task]
async fn control_task(mut task: Control) {
    task.run().await
}

#[embassy_executor::task]
async fn fire_task(mut task: Fire) {
    task.run().await
}

// ── Main ──────────────────────────────────────────────────────────────────────
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    // 1. Board init (168 MHz PLL, TIM3 at 84 MHz)
    let board = Board::init();
    let p = board.p;

    let config = defmt::unwrap!(TurretConfig::DEFAULT.validated());

    // 2. Servos on TIM3: tilt CH1 (PA6), pan CH3 (PC8), trigger CH4 (PC9)
    let mut servos = ServoTimer::new(p.TIM3, p.PA6, p.PC8, p.PC9, &config);
    let channels = servos.channels();

    // 3. Host link USART3 @ 115200 via ST-LINK VCP (TX=PD8, RX=PD9)
    let mut host_config = UsartConfig::default();
    host_config.baudrate = HOST_BAUD;
    let host_uart = Uart::new(
        p.USART3, p.PD9, p.PD8,
        Irqs,
        p.DMA1_CH3, p.DMA1_CH1,
        host_config,
    ).unwrap();
    let (host_tx, host_rx) = host_uart.split();
    let host_rx = HostRx::new(host_rx.into_ring_buffered(HOST_RX_DMA.init([0; 64])));
    let host_tx = HostTx::new(HOST_TX.init(Mutex::new(host_tx)));

    // 4. Indicators: busy line PG3, fire lamp LD3 (PB14), heartbeat LD1 (PB0)
    let busy = SharedLine::new(BUSY_LINE.init(BlockingMutex::new(RefCell::new(Output::new(
        p.PG3.degrade(),
        Level::Low,
        Speed::Low,
    )))));
    let fire_lamp = Lamp::new(Output::new(p.PB14.degrade(), Level::Low, Speed::Low));
    let mut led = Output::new(p.PB0, Level::High, Speed::Low);

    // 5. Tasks
    let mut fire = FireTask::new(
        FirePorts {
            trigger: channels.trigger,
            busy,
            responses: host_tx,
        },
        &SHARED,
        config.fire,
    );
    fire.arm();

    let control = ControlTask::new(
        ControlPorts {
            pan: channels.pan,
            tilt: channels.tilt,
            busy,
            responses: host_tx,
        },
        &SHARED,
        &config,
    );

    let command = CommandTask::new(
        CommandPorts {
            link: host_rx,
            busy,
            fire_lamp,
            pan: channels.pan_recenter,
            tilt: channels.tilt_recenter,
        },
        &SHARED,
        config,
    );

    interrupt::UART5.set_priority(Priority::P6);
    let high_spawner = EXECUTOR_HIGH.start(interrupt::UART5);
    high_spawner.spawn(fire_task(fire)).unwrap();

    spawner.spawn(control_task(control)).unwrap();
    spawner.spawn(command_task(command)).unwrap();

    log_info!("turret ready");

    // 6. Main task: LED heartbeat @ 1 Hz
    loop {
        led.toggle();
        Timer::after(Duration::from_millis(500)).await;
    }
}
