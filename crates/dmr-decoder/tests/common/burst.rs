use dmr_core::burst_consts::{
    BITS_PER_DIBIT, BURST_BITS, INFO1_OFFSET, INFO2_OFFSET, INFO_BITS, INFO_HALF_BITS, SLOT_TYPE1_OFFSET,
    SLOT_TYPE2_OFFSET, SLOT_TYPE_HALF_BITS, SYNC_BITS, SYNC_OFFSET,
};
use dmr_core::edac::bptc::encode_196_96;
use dmr_core::edac::crc16::CRC_MASK_CSBK;
use dmr_core::{BitBuffer, Dibit, SyncPattern};
use dmr_decoder::{DataUnitDetector, DataUnitListener};
use dmr_pdus::enums::csbk_opcode::CsbkOpcode;
use dmr_pdus::enums::data_type::DataType;
use dmr_pdus::enums::feature_set_id::FeatureSetId;
use dmr_pdus::fields::slot_type::{SLOT_TYPE_BITS, SlotType};
use dmr_pdus::pdus::csbk::Csbk;
use dmr_pdus::pdus::data_header::{DataHeader, DataHeaderContent, PacketSequenceHeader};

/// CACH bit carrying TC, the second TACT bit
const CACH_TC_BIT: usize = 4;

pub const COLOUR_CODE: u8 = 1;

/// Lays out one 288-bit burst: CACH, info halves around slot type and sync
pub fn build_frame(pattern: SyncPattern, timeslot_channel: u8, data_type: DataType, coded_info: &BitBuffer) -> BitBuffer {
    assert_eq!(coded_info.get_len(), INFO_BITS);
    let mut frame = BitBuffer::new(BURST_BITS);

    frame.seek(CACH_TC_BIT);
    frame.write_bit(timeslot_channel & 0x1);

    for (half, offset) in [INFO1_OFFSET, INFO2_OFFSET].into_iter().enumerate() {
        let mut src = coded_info.slice(half * INFO_HALF_BITS, INFO_HALF_BITS).unwrap();
        frame.seek(offset);
        frame.copy_bits(&mut src, INFO_HALF_BITS);
    }

    let mut slot_type = BitBuffer::new(SLOT_TYPE_BITS);
    SlotType { colour_code: COLOUR_CODE, data_type, parity: 0 }.to_bitbuf(&mut slot_type);
    frame.seek(SLOT_TYPE1_OFFSET);
    frame.write_bits(slot_type.peek_bits_startoffset(0, SLOT_TYPE_HALF_BITS).unwrap(), SLOT_TYPE_HALF_BITS);
    frame.seek(SLOT_TYPE2_OFFSET);
    frame.write_bits(slot_type.peek_bits_startoffset(SLOT_TYPE_HALF_BITS, SLOT_TYPE_HALF_BITS).unwrap(), SLOT_TYPE_HALF_BITS);

    frame.seek(SYNC_OFFSET);
    frame.write_bits(pattern.pattern(), SYNC_BITS);
    frame.seek(0);
    frame
}

/// BPTC(196,96) protected burst around a 96-bit block
pub fn bptc_frame(pattern: SyncPattern, timeslot_channel: u8, data_type: DataType, block: &BitBuffer) -> BitBuffer {
    build_frame(pattern, timeslot_channel, data_type, &encode_196_96(block).unwrap())
}

pub fn frame_to_dibits(frame: &BitBuffer) -> Vec<Dibit> {
    (0..frame.get_len() / BITS_PER_DIBIT)
        .map(|i| Dibit::from_value(frame.peek_bits_startoffset(i * BITS_PER_DIBIT, BITS_PER_DIBIT).unwrap() as u8))
        .collect()
}

pub fn feed<L: DataUnitListener>(detector: &mut DataUnitDetector<L>, dibits: &[Dibit]) {
    for dibit in dibits {
        detector.receive(*dibit).unwrap();
    }
}

pub fn aloha_csbk() -> Csbk {
    Csbk {
        last_block: true,
        protect: false,
        opcode: CsbkOpcode::Aloha,
        feature_set: FeatureSetId::Standard,
        payload: 0x0123_4567_89AB_CDEF,
        crc: 0,
        corrected_bits: 0,
    }
}

pub fn csbk_block(csbk: &Csbk) -> BitBuffer {
    let mut block = BitBuffer::new(96);
    csbk.to_bitbuf(&mut block, CRC_MASK_CSBK);
    block
}

pub fn unconfirmed_header(blocks_to_follow: u8) -> PacketSequenceHeader {
    PacketSequenceHeader {
        confirmed: false,
        group: false,
        response_requested: false,
        header_compression: false,
        pad_octet_count: 0,
        sap_id: 4,
        destination_llid: 0x000C_0FFE,
        source_llid: 0x0000_1234,
        full_message: true,
        blocks_to_follow,
        resynchronize: None,
        send_sequence_number: None,
        fragment_sequence_number: 0,
    }
}

pub fn data_header(content: DataHeaderContent) -> DataHeader {
    DataHeader { content, crc: 0, corrected_bits: 0 }
}

pub fn header_block(header: &DataHeader) -> BitBuffer {
    let mut block = BitBuffer::new(96);
    header.to_bitbuf(&mut block);
    block
}
