use crate::model::deck::{AirState, Lang};
use crate::stats::Speed;

/// Renderer captions for one language.
pub(crate) struct Labels {
    pub(crate) fleet: &'static str,
    pub(crate) los: &'static str,
    pub(crate) air_power: &'static str,
    pub(crate) speed: &'static str,
    pub(crate) level: &'static str,
    pub(crate) empty: &'static str,
    pub(crate) air_state: &'static str,
    pub(crate) comment: &'static str,
    pub(crate) airbase: &'static str,
    pub(crate) ships: &'static str,
    pub(crate) hp: &'static str,
    pub(crate) luck: &'static str,
    airbase_modes: [&'static str; 3],
    speeds: [&'static str; 4],
    air_states: [&'static str; 5],
}

const JP: Labels = Labels {
    fleet: "第{}艦隊",
    los: "索敵",
    air_power: "制空",
    speed: "速力",
    level: "Lv",
    empty: "空き",
    air_state: "制空状態",
    comment: "コメント",
    airbase: "基地航空隊",
    ships: "隻",
    hp: "耐久",
    luck: "運",
    airbase_modes: ["待機", "出撃", "防空"],
    speeds: ["低速", "高速", "高速+", "最速"],
    air_states: ["確保", "優勢", "均衡", "劣勢", "喪失"],
};

const EN: Labels = Labels {
    fleet: "Fleet {}",
    los: "LoS",
    air_power: "Air Power",
    speed: "Speed",
    level: "Lv",
    empty: "Empty",
    air_state: "Air State",
    comment: "Comment",
    airbase: "Land Base",
    ships: "ships",
    hp: "HP",
    luck: "Luck",
    airbase_modes: ["Standby", "Sortie", "Air Defense"],
    speeds: ["Slow", "Fast", "Fast+", "Fastest"],
    air_states: [
        "Supremacy",
        "Superiority",
        "Parity",
        "Denial",
        "Incapability",
    ],
};

const KR: Labels = Labels {
    fleet: "제{}함대",
    los: "색적",
    air_power: "제공",
    speed: "속력",
    level: "Lv",
    empty: "빈칸",
    air_state: "제공상태",
    comment: "코멘트",
    airbase: "기지항공대",
    ships: "척",
    hp: "내구",
    luck: "운",
    airbase_modes: ["대기", "출격", "방공"],
    speeds: ["저속", "고속", "고속+", "최속"],
    air_states: ["확보", "우세", "균형", "열세", "상실"],
};

const SCN: Labels = Labels {
    fleet: "第{}舰队",
    los: "索敌",
    air_power: "制空",
    speed: "航速",
    level: "Lv",
    empty: "空",
    air_state: "制空状态",
    comment: "备注",
    airbase: "基地航空队",
    ships: "艘",
    hp: "耐久",
    luck: "运",
    airbase_modes: ["待机", "出击", "防空"],
    speeds: ["低速", "高速", "高速+", "最速"],
    air_states: ["确保", "优势", "均衡", "劣势", "丧失"],
};

impl Labels {
    pub(crate) fn for_lang(lang: Lang) -> &'static Self {
        match lang {
            Lang::Jp => &JP,
            Lang::En => &EN,
            Lang::Kr => &KR,
            Lang::Scn => &SCN,
        }
    }

    pub(crate) fn fleet_title(&self, index: usize) -> String {
        self.fleet.replace("{}", &(index + 1).to_string())
    }

    pub(crate) fn speed_name(&self, speed: Speed) -> &'static str {
        match speed.0 {
            0..=5 => self.speeds[0],
            6..=10 => self.speeds[1],
            11..=15 => self.speeds[2],
            _ => self.speeds[3],
        }
    }

    /// Mode 1 sorties, mode 2 defends the base, anything else stands by.
    pub(crate) fn airbase_mode_name(&self, mode: u8) -> &'static str {
        match mode {
            1 => self.airbase_modes[1],
            2 => self.airbase_modes[2],
            _ => self.airbase_modes[0],
        }
    }

    pub(crate) fn air_state_name(&self, state: AirState) -> &'static str {
        let idx = match state {
            AirState::Supremacy => 0,
            AirState::Superiority => 1,
            AirState::Parity => 2,
            AirState::Denial => 3,
            AirState::Incapability => 4,
        };
        self.air_states[idx]
    }
}
